use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// One observed inconsistency. `file` is project-relative with `/`
/// separators regardless of platform; `line` is 1-based where known.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Finding {
    pub severity: Severity,
    pub file: String,
    pub line: Option<usize>,
    pub message: String,
}

impl Finding {
    pub fn error(file: impl Into<String>, line: Option<usize>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            file: file.into(),
            line,
            message: message.into(),
        }
    }

    pub fn warning(
        file: impl Into<String>,
        line: Option<usize>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity: Severity::Warning,
            file: file.into(),
            line,
            message: message.into(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct CheckReport {
    pub findings: Vec<Finding>,
}

impl CheckReport {
    pub fn push(&mut self, finding: Finding) {
        self.findings.push(finding);
    }

    pub fn error_count(&self) -> usize {
        self.findings
            .iter()
            .filter(|finding| finding.severity == Severity::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.findings
            .iter()
            .filter(|finding| finding.severity == Severity::Warning)
            .count()
    }

    /// Warnings never break the build; only error findings do.
    pub fn exit_code(&self) -> i32 {
        if self.error_count() > 0 {
            1
        } else {
            0
        }
    }
}

/// Findings print either as CI workflow annotations or as plain
/// console lines. Both carry the same data; the choice never affects
/// exit codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputMode {
    Annotations,
    Plain,
}

impl OutputMode {
    pub fn from_env() -> Self {
        match std::env::var("GITHUB_ACTIONS") {
            Ok(value) if value == "true" => OutputMode::Annotations,
            _ => OutputMode::Plain,
        }
    }

    pub fn format(self, finding: &Finding) -> String {
        match self {
            OutputMode::Annotations => {
                let level = match finding.severity {
                    Severity::Error => "error",
                    Severity::Warning => "warning",
                };
                match finding.line {
                    Some(line) => format!(
                        "::{} file={},line={}::{}",
                        level, finding.file, line, finding.message
                    ),
                    None => format!("::{} file={}::{}", level, finding.file, finding.message),
                }
            }
            OutputMode::Plain => {
                let tag = match finding.severity {
                    Severity::Error => "ERROR",
                    Severity::Warning => "WARN",
                };
                match finding.line {
                    Some(line) => {
                        format!("  [{}] {}:{}: {}", tag, finding.file, line, finding.message)
                    }
                    None => format!("  [{}] {}: {}", tag, finding.file, finding.message),
                }
            }
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", OutputMode::Plain.format(self))
    }
}

pub fn emit(mode: OutputMode, report: &CheckReport) {
    for finding in &report.findings {
        println!("{}", mode.format(finding));
    }
}
