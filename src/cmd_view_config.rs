//! `view-config` subcommand: resolve `ClientEval:` expressions for a node.

use std::path::Path;

use serde_json::Value;

use edithost_core::view_config::preprocess;

fn read_json(path: &Path) -> Result<Value, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Print the view configuration with every expression evaluated.
pub(crate) fn view_config(view: &Path, node: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let original = read_json(view)?;
    let node = read_json(node)?;

    let resolved = preprocess(&original, &original, &node);
    println!("{}", serde_json::to_string_pretty(&resolved)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_json() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"hidden": "ClientEval:node.properties.hidden"}}"#).unwrap();
        let value = read_json(file.path()).unwrap();
        assert_eq!(value["hidden"], "ClientEval:node.properties.hidden");
    }

    #[test]
    fn test_view_config_reads_both_files() {
        let mut view = NamedTempFile::new().unwrap();
        write!(view, r#"{{"hidden": "ClientEval:!node.properties.visible"}}"#).unwrap();
        let mut node = NamedTempFile::new().unwrap();
        write!(node, r#"{{"properties": {{"visible": true}}}}"#).unwrap();

        assert!(view_config(view.path(), node.path()).is_ok());
        assert!(view_config(view.path(), Path::new("/nonexistent/node.json")).is_err());
    }
}
