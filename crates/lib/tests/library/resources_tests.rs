use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

use serde_json::json;
use stowage_lib::{AssociativeEntity, Entity, ResourceRecord, StorageManager};

use super::common::TestEnv;

#[test]
fn widget_fixture_hydrates() {
  let env = TestEnv::with_fixtures(&["widget"]);

  let widget = env.manager.get::<AssociativeEntity>("widget").unwrap();
  assert_eq!(widget.get("a"), Some(&json!(1)));
  assert_eq!(env.manager.read_resource_data("widget"), Some(json!({"a": 1})));
  assert_eq!(
    widget.file_path(),
    env.temp.path().join("widget.entity.json")
  );
}

#[test]
fn nested_data_survives_hydration() {
  let env = TestEnv::with_fixtures(&["settings"]);

  let settings = env.manager.get::<AssociativeEntity>("settings").unwrap();
  assert_eq!(settings.get("locale"), Some(&json!("en_GB")));
  assert_eq!(settings.get("limits"), Some(&json!({"uploads": 20})));
  assert_eq!(settings.len(), 3);
  let keys: Vec<_> = settings.iter().map(|(k, _)| k.as_str()).collect();
  assert_eq!(keys, vec!["features", "limits", "locale"]);
}

#[test]
fn foreign_kind_is_not_hydrated() {
  let env = TestEnv::with_fixtures(&["foreign-kind"]);

  assert!(env.manager.resource_path("foreign-kind").exists());
  assert!(env.manager.get_resource("foreign-kind").is_none());
  assert!(env.manager.try_get_resource("foreign-kind").is_err());
  assert!(env.manager.loaded_names().is_empty());
}

#[test]
fn never_persisted_names_are_absent() {
  let env = TestEnv::with_fixtures(&["widget"]);

  for name in ["gadget", "Widget", "widget.entity", "../widget", "widget "] {
    assert!(env.manager.get_resource(name).is_none(), "{name} should be absent");
    assert!(env.manager.read_resource_data(name).is_none(), "{name} should have no data");
  }
}

#[test]
fn repeated_access_reads_the_file_once() {
  let env = TestEnv::with_fixtures(&["widget", "settings"]);

  let first = env.manager.get_resource("widget").unwrap();
  for _ in 0..25 {
    assert!(Arc::ptr_eq(&first, &env.manager.get_resource("widget").unwrap()));
  }
  assert_eq!(env.manager.stats().record_reads, 1);

  env.manager.get_resource("settings").unwrap();
  env.manager.get_resource("settings").unwrap();
  let stats = env.manager.stats();
  assert_eq!(stats.record_reads, 2);
  assert_eq!(stats.hydrations, 2);
  assert_eq!(env.manager.loaded_names(), vec!["settings".to_string(), "widget".to_string()]);
}

#[test]
fn concurrent_first_access_hydrates_once() {
  let env = TestEnv::with_fixtures(&["widget"]);
  let manager = &env.manager;

  let entities: Vec<Arc<dyn Entity>> = thread::scope(|scope| {
    let handles: Vec<_> = (0..8)
      .map(|_| scope.spawn(|| manager.get_resource("widget").unwrap()))
      .collect();
    handles.into_iter().map(|h| h.join().unwrap()).collect()
  });

  assert!(entities.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
  assert_eq!(manager.stats().hydrations, 1);
  assert_eq!(manager.stats().record_reads, 1);
}

#[test]
fn detached_data_does_not_leak_into_entity() {
  let env = TestEnv::with_fixtures(&["settings"]);
  let settings = env.manager.get::<AssociativeEntity>("settings").unwrap();

  let mut data = env.manager.read_resource_data("settings").unwrap();
  data["locale"] = json!("fr_FR");
  data["limits"]["uploads"] = json!(0);

  assert_eq!(settings.get("locale"), Some(&json!("en_GB")));
  assert_eq!(
    env.manager.read_resource_data("settings").unwrap()["limits"]["uploads"],
    json!(20)
  );
}

#[test]
fn names_map_to_distinct_files() {
  let env = TestEnv::new();
  let names = ["widget", "Widget", "app/settings", "app settings", "app-settings", "ünïcödé"];

  let paths: HashSet<_> = names.iter().map(|n| env.manager.resource_path(n)).collect();
  assert_eq!(paths.len(), names.len());
  for path in &paths {
    assert_eq!(path.parent(), Some(env.manager.storage_directory()));
  }

  for (i, name) in names.iter().enumerate() {
    ResourceRecord::new(*name, "associative", json!({"index": i}))
      .write(&env.manager.resource_path(name))
      .unwrap();
  }
  for (i, name) in names.iter().enumerate() {
    let entity = env.manager.get::<AssociativeEntity>(name).unwrap();
    assert_eq!(entity.get("index"), Some(&json!(i)));
  }
}

#[test]
fn managers_do_not_share_memo_tables() {
  let env = TestEnv::with_fixtures(&["widget"]);
  let other = StorageManager::builder()
    .storage_directory(env.temp.path())
    .build()
    .unwrap();

  let a = env.manager.get_resource("widget").unwrap();
  let b = other.get_resource("widget").unwrap();
  assert!(!Arc::ptr_eq(&a, &b));
  assert_eq!(a.data(), b.data());
}

#[test]
fn saved_edits_are_seen_by_a_fresh_manager() {
  let env = TestEnv::with_fixtures(&["widget"]);
  let widget = env.manager.get::<AssociativeEntity>("widget").unwrap();

  let mut editor = widget.edit();
  editor.set("b", 2);
  editor.save().unwrap();

  let fresh = StorageManager::builder()
    .storage_directory(env.temp.path())
    .build()
    .unwrap();
  assert_eq!(fresh.read_resource_data("widget"), Some(json!({"a": 1, "b": 2})));
  assert_eq!(env.manager.read_resource_data("widget"), Some(json!({"a": 1})));
}
