//! Kept in its own test binary: it is the only test that mutates the
//! process environment.

use std::path::PathBuf;

use bert_local::{resolve_default_path, ENV_OVERRIDE};

#[test]
fn env_override_is_returned_verbatim() {
    for value in ["/opt/models/bert", "relative/bert dir", "~/not-expanded"] {
        std::env::set_var(ENV_OVERRIDE, value);
        assert_eq!(resolve_default_path(), PathBuf::from(value));
    }

    // The manifest directory has no third_party ancestor in this checkout,
    // so both cases land on the working-directory fallback.
    let expected = std::env::current_dir()
        .unwrap()
        .join("third_party")
        .join("bert-base-uncased");

    std::env::set_var(ENV_OVERRIDE, "");
    assert_eq!(resolve_default_path(), expected);

    std::env::remove_var(ENV_OVERRIDE);
    assert_eq!(resolve_default_path(), expected);
}
