use folio3d::palette::Palette;
use folio3d::store::{FileStore, KeyValueStore, MemoryStore};
use folio3d::theme::{resolve_initial_theme, ThemeController, ThemeMode, THEME_KEY};
use tempfile::TempDir;

#[test]
fn first_visit_follows_light_os_preference() {
    assert_eq!(resolve_initial_theme(&MemoryStore::new(), &Some(false)), ThemeMode::Light);

    let mut theme = ThemeController::new(MemoryStore::new(), &Some(false));
    assert_eq!(theme.mode(), ThemeMode::Light);

    theme.apply_theme(ThemeMode::Light);
    assert_eq!(theme.root().markers().collect::<Vec<_>>(), vec!["light"]);
    assert_eq!(theme.store().get(THEME_KEY).unwrap().as_deref(), Some("light"));
    assert_eq!(theme.palette(), Palette::LIGHT);
}

#[test]
fn stored_choice_beats_os_preference() {
    let theme = ThemeController::new(MemoryStore::with(THEME_KEY, "dark"), &Some(false));
    assert_eq!(theme.mode(), ThemeMode::Dark);
    assert!(theme.root().has("dark"));
    assert!(!theme.root().has("light"));
}

#[test]
fn toggle_survives_a_restart() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("prefs").join(FileStore::FILE_NAME);

    let mut first = ThemeController::new(FileStore::new(&path), &None::<bool>);
    assert_eq!(first.mode(), ThemeMode::Dark);
    assert_eq!(first.toggle_theme(), ThemeMode::Light);
    drop(first);

    // OS says dark, but the stored choice wins
    let second = ThemeController::new(FileStore::new(&path), &Some(true));
    assert_eq!(second.mode(), ThemeMode::Light);
    assert_eq!(second.root().markers().collect::<Vec<_>>(), vec!["light"]);
}

#[test]
fn corrupt_preferences_fall_back_and_are_replaced() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(FileStore::FILE_NAME);
    std::fs::write(&path, "{ not json").unwrap();

    let mut theme = ThemeController::new(FileStore::new(&path), &Some(false));
    assert_eq!(theme.mode(), ThemeMode::Light);
    theme.toggle_theme();

    let reopened = FileStore::new(&path);
    assert_eq!(reopened.get(THEME_KEY).unwrap().as_deref(), Some("dark"));
}
