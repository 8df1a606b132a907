use std::fs;

use luapack_lib::config::Settings;
use luapack_lib::stamp::{Declaration, FixedRevision, StampOutcome, read_recorded_revision, reconcile};

use super::common::write_file;

#[test]
fn build_info_tracks_revision_changes() {
  let temp = tempfile::TempDir::new().unwrap();
  let settings = Settings::default();
  let path = temp.path().join(&settings.build_info.path);
  write_file(&path, "");
  let decl = Declaration::from_settings(&settings.build_info);

  let first = reconcile(&path, &FixedRevision(Some("abc123".into())), &decl).unwrap();
  let again = reconcile(&path, &FixedRevision(Some("abc123".into())), &decl).unwrap();
  let moved = reconcile(&path, &FixedRevision(Some("def456".into())), &decl).unwrap();

  assert!(matches!(first, StampOutcome::Regenerated { previous: None, .. }));
  assert!(matches!(again, StampOutcome::Unchanged { .. }));
  assert_eq!(
    moved,
    StampOutcome::Regenerated {
      previous: Some("abc123".to_string()),
      revision: "def456".to_string(),
    }
  );
  assert_eq!(read_recorded_revision(&path, &decl).as_deref(), Some("def456"));
  assert_eq!(fs::read_to_string(&path).unwrap().lines().count(), 1);
}
