//! Property tests for file validation and the display preference

use proptest::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

use topiccut::core::{FileCandidate, InputCollector, SelectionOrigin, SizeLimit, ValidationError};
use topiccut::storage::{DisplayPreferences, LocalStorage};

fn candidate(file_name: &str) -> FileCandidate {
    FileCandidate {
        path: PathBuf::from(file_name),
        file_name: file_name.to_string(),
        size: Some(64),
    }
}

fn supported_ext() -> impl Strategy<Value = String> {
    prop_oneof![Just("vtt"), Just("pdf"), Just("txt")].prop_flat_map(|ext| {
        // Any letter casing of the extension
        proptest::collection::vec(any::<bool>(), ext.len()).prop_map(move |upper| {
            ext.chars()
                .zip(upper)
                .map(|(c, u)| if u { c.to_ascii_uppercase() } else { c })
                .collect::<String>()
        })
    })
}

proptest! {
    #[test]
    fn supported_extensions_are_accepted(stem in "[a-zA-Z0-9 _.-]{0,20}", ext in supported_ext()) {
        let mut input = InputCollector::new(SizeLimit::default());
        let name = format!("{}.{}", stem, ext);
        prop_assert!(input.select_file(candidate(&name), SelectionOrigin::Picker).is_ok());
        prop_assert_eq!(input.selected_file().map(|f| f.file_name.clone()), Some(name));
        prop_assert!(input.error().is_none());
    }

    #[test]
    fn rejected_drop_keeps_previous_selection(
        stem in "[a-z0-9]{1,12}",
        ext in "[a-z]{1,5}",
    ) {
        prop_assume!(!["vtt", "pdf", "txt"].contains(&ext.as_str()));

        let mut input = InputCollector::new(SizeLimit::default());
        input.select_file(candidate("keep.txt"), SelectionOrigin::Picker).unwrap();

        let name = format!("{}.{}", stem, ext);
        let err = input
            .select_file(candidate(&name), SelectionOrigin::Drop)
            .unwrap_err();

        prop_assert_eq!(err, ValidationError::UnsupportedFileType { file_name: name });
        prop_assert_eq!(
            input.selected_file().map(|f| f.file_name.as_str()),
            Some("keep.txt")
        );
        prop_assert!(input.error().is_some());
    }

    #[test]
    fn rejected_pick_clears_previous_selection(stem in "[a-z0-9]{1,12}", ext in "(docx|mp4|json|md)") {
        let mut input = InputCollector::new(SizeLimit::default());
        input.select_file(candidate("keep.vtt"), SelectionOrigin::Picker).unwrap();

        let name = format!("{}.{}", stem, ext);
        prop_assert!(input.select_file(candidate(&name), SelectionOrigin::Picker).is_err());
        prop_assert!(input.selected_file().is_none());
    }

    #[test]
    fn double_toggle_restores_preference(start in any::<bool>(), toggles in 1usize..6) {
        let dir = TempDir::new().unwrap();
        let mut prefs = DisplayPreferences::load(LocalStorage::in_dir(dir.path()));
        prefs.write(start);

        let mut expected = start;
        for _ in 0..toggles {
            expected = !expected;
            prop_assert_eq!(prefs.toggle(), expected);
        }

        // A fresh load sees what was persisted
        let reloaded = DisplayPreferences::load(LocalStorage::in_dir(dir.path()));
        prop_assert_eq!(reloaded.read(), expected);
        prop_assert_eq!(reloaded.read(), if toggles % 2 == 0 { start } else { !start });
    }
}
