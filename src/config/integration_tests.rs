use serde_json::json;
use std::io::Write;
use tempfile::NamedTempFile;

use crate::config::{load_and_validate_config, RuntimeBuilder};
use crate::errors::ConfigError;

/// Config file -> runtime -> consume, end to end
#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(yaml: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn configured_chain_runs_with_local_handlers() {
        let file = write_config(
            r#"
chains:
  - id: greet
    metadata: { owner: demo }
    steps:
      - event: text.change_case
        props: { text: "hello chains", case: title }
      - event: sleep
        props: { duration: 5 }
      - event: text.prefix_suffix
        props: { prefix: "** ", suffix: " **" }
"#,
        );

        let cfg = load_and_validate_config(file.path()).unwrap();
        let engine = RuntimeBuilder::from_config(&cfg).unwrap();

        let declared = engine.get_chains();
        assert_eq!(declared["greet"].metadata["owner"], json!("demo"));
        assert!(declared["greet"].steps[1].is_delay());

        let report = engine.consume("greet").await;
        assert!(report.is_clean());
        assert_eq!(report.context["text"], json!("** Hello Chains **"));
    }

    #[tokio::test]
    async fn custom_alias_becomes_delay() {
        let file = write_config(
            "engine:\n  delay_aliases: [pause]\nchains:\n  - id: p\n    steps:\n      - event: pause\n        props: { duration: 1 }\n",
        );
        let cfg = load_and_validate_config(file.path()).unwrap();
        let engine = RuntimeBuilder::from_config(&cfg).unwrap();
        assert!(engine.get_chains()["p"].steps[0].is_delay());
    }

    #[test]
    fn invalid_file_is_rejected_before_building() {
        let file = write_config("chains:\n  - id: bad\n    steps:\n      - event: sleep\n        props: { duration: -1 }\n");
        assert!(matches!(
            load_and_validate_config(file.path()),
            Err(ConfigError::Invalid(_))
        ));
    }
}
