//! Engine backed by an external parser process
//!
//! One child process per request: the text goes to stdin, the CoNLL-U result
//! is read from stdout. A dedicated exit status marks rejected input, in
//! which case stderr carries the message for the client.

use super::{Analyzer, EngineError};
use crate::config::EngineConfig;
use std::io::{self, Write};
use std::process::{Command, Stdio};

/// Placeholder in `engine.args` replaced by the language tag
const LANG_PLACEHOLDER: &str = "{lang}";

#[derive(Debug, Clone)]
pub struct ProcessAnalyzer {
    command: String,
    args: Vec<String>,
    languages: Vec<String>,
    validation_exit_code: i32,
}

impl ProcessAnalyzer {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            command: config.command.clone(),
            args: config.args.clone(),
            languages: config
                .languages
                .iter()
                .map(|l| l.to_ascii_lowercase())
                .collect(),
            validation_exit_code: config.validation_exit_code,
        }
    }

    fn check_language(&self, language: &str) -> Result<(), EngineError> {
        let well_formed = !language.is_empty()
            && language
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');
        if !well_formed {
            return Err(EngineError::Validation(format!(
                "Invalid language tag: {language}"
            )));
        }

        if !self.languages.is_empty() && !self.languages.iter().any(|l| l == language) {
            return Err(EngineError::Validation(format!(
                "Unsupported language: {language}"
            )));
        }

        Ok(())
    }

    fn build_command(&self, language: &str) -> Command {
        let mut cmd = Command::new(&self.command);
        cmd.args(self.args.iter().map(|a| a.replace(LANG_PLACEHOLDER, language)))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }
}

impl Analyzer for ProcessAnalyzer {
    fn analyze(&self, text: &[u8], language: &str) -> Result<String, EngineError> {
        if std::str::from_utf8(text).is_err() {
            return Err(EngineError::Validation(
                "Text must be valid UTF-8".to_string(),
            ));
        }
        self.check_language(language)?;

        let mut child = self
            .build_command(language)
            .spawn()
            .map_err(|source| EngineError::Spawn {
                command: self.command.clone(),
                source,
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| io::Error::other("engine stdin is not piped"))?;

        // Feed stdin while draining stdout/stderr so neither pipe can fill up
        let (output, written) = std::thread::scope(|scope| {
            let writer = scope.spawn(move || stdin.write_all(text));
            let output = child.wait_with_output();
            (output, writer.join())
        });
        let output = output?;

        match written {
            // The child may exit without reading everything
            Ok(Ok(())) => {}
            Ok(Err(e)) if e.kind() == io::ErrorKind::BrokenPipe => {}
            Ok(Err(e)) => return Err(e.into()),
            Err(_) => return Err(io::Error::other("engine stdin writer panicked").into()),
        }

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

        if output.status.code() == Some(self.validation_exit_code) {
            return Err(EngineError::Validation(stderr));
        }
        if !output.status.success() {
            return Err(EngineError::Failed {
                status: output.status.to_string(),
                stderr,
            });
        }

        String::from_utf8(output.stdout).map_err(|_| EngineError::InvalidOutput)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyzer(command: &str, args: &[&str], languages: &[&str]) -> ProcessAnalyzer {
        ProcessAnalyzer::from_config(&EngineConfig {
            command: command.to_string(),
            args: args.iter().map(ToString::to_string).collect(),
            languages: languages.iter().map(ToString::to_string).collect(),
            default_language: "en".to_string(),
            validation_exit_code: 2,
        })
    }

    #[test]
    fn test_rejects_non_utf8_text() {
        let engine = analyzer("does-not-matter", &[], &[]);
        let err = engine.analyze(&[0xff, 0xfe], "en").unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)), "{err}");
        assert_eq!(err.to_string(), "Text must be valid UTF-8");
    }

    #[test]
    fn test_rejects_malformed_language_tag() {
        let engine = analyzer("does-not-matter", &[], &[]);
        for tag in ["", "en us", "../x", "EN"] {
            let err = engine.analyze(b"Hello", tag).unwrap_err();
            assert_eq!(err.to_string(), format!("Invalid language tag: {tag}"));
        }
    }

    #[test]
    fn test_rejects_unlisted_language() {
        let engine = analyzer("does-not-matter", &[], &["en", "FR"]);
        let err = engine.analyze(b"Hello", "de").unwrap_err();
        assert_eq!(err.to_string(), "Unsupported language: de");
    }

    #[test]
    fn test_missing_command_is_not_validation() {
        let engine = analyzer("/nonexistent/parsey-binary", &[], &[]);
        let err = engine.analyze(b"Hello", "en").unwrap_err();
        assert!(matches!(err, EngineError::Spawn { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_stdout_is_result() {
        let engine = analyzer("cat", &[], &["en"]);
        let result = engine.analyze("Bob brought the pizza.".as_bytes(), "en").unwrap();
        assert_eq!(result, "Bob brought the pizza.");
    }

    #[cfg(unix)]
    #[test]
    fn test_language_placeholder() {
        let engine = analyzer("sh", &["-c", "printf 'lang=%s' \"$0\"", "{lang}"], &[]);
        assert_eq!(engine.analyze(b"", "fr").unwrap(), "lang=fr");
    }

    #[cfg(unix)]
    #[test]
    fn test_validation_exit_code() {
        let engine = analyzer(
            "sh",
            &["-c", "echo \"Unsupported language: $0\" >&2; exit 2", "{lang}"],
            &[],
        );
        let err = engine.analyze(b"Hello", "xx").unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)), "{err}");
        assert_eq!(err.to_string(), "Unsupported language: xx");
    }

    #[cfg(unix)]
    #[test]
    fn test_other_exit_code_is_failure() {
        let engine = analyzer("sh", &["-c", "echo boom >&2; exit 3"], &[]);
        match engine.analyze(b"Hello", "en").unwrap_err() {
            EngineError::Failed { stderr, .. } => assert_eq!(stderr, "boom"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
