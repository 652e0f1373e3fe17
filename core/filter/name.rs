//! Filters on the final path component. None of them touch the file system.

use crate::filter::{FileFilter, IoCase, file_name};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use regex::{Regex, RegexBuilder};
use std::io;
use std::path::Path;

fn collect_strings<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    items.into_iter().map(Into::into).collect()
}

/// Accepts a path whose file name equals one of the given names.
#[derive(Debug, Clone)]
pub struct NameFilter {
    names: Vec<String>,
    case: IoCase,
}

impl NameFilter {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        NameFilter {
            names: collect_strings(names),
            case: IoCase::Sensitive,
        }
    }

    pub fn with_case(mut self, case: IoCase) -> Self {
        self.case = case;
        self
    }
}

impl FileFilter for NameFilter {
    fn accept(&self, path: &Path) -> io::Result<bool> {
        Ok(file_name(path)
            .is_some_and(|name| self.names.iter().any(|n| self.case.equals(&name, n))))
    }

    fn name(&self) -> &'static str {
        "name"
    }
}

#[derive(Debug, Clone)]
pub struct PrefixFilter {
    prefixes: Vec<String>,
    case: IoCase,
}

impl PrefixFilter {
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        PrefixFilter {
            prefixes: collect_strings(prefixes),
            case: IoCase::Sensitive,
        }
    }

    pub fn with_case(mut self, case: IoCase) -> Self {
        self.case = case;
        self
    }
}

impl FileFilter for PrefixFilter {
    fn accept(&self, path: &Path) -> io::Result<bool> {
        Ok(file_name(path)
            .is_some_and(|name| self.prefixes.iter().any(|p| self.case.starts_with(&name, p))))
    }

    fn name(&self) -> &'static str {
        "prefix"
    }
}

#[derive(Debug, Clone)]
pub struct SuffixFilter {
    suffixes: Vec<String>,
    case: IoCase,
}

impl SuffixFilter {
    pub fn new<I, S>(suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        SuffixFilter {
            suffixes: collect_strings(suffixes),
            case: IoCase::Sensitive,
        }
    }

    pub fn with_case(mut self, case: IoCase) -> Self {
        self.case = case;
        self
    }
}

impl FileFilter for SuffixFilter {
    fn accept(&self, path: &Path) -> io::Result<bool> {
        Ok(file_name(path)
            .is_some_and(|name| self.suffixes.iter().any(|s| self.case.ends_with(&name, s))))
    }

    fn name(&self) -> &'static str {
        "suffix"
    }
}

/// Shell-style `*` and `?` patterns matched against the file name.
#[derive(Debug, Clone)]
pub struct WildcardFilter {
    patterns: Vec<String>,
    set: GlobSet,
}

impl WildcardFilter {
    pub fn new<I, S>(patterns: I, case: IoCase) -> Result<Self, globset::Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let patterns = collect_strings(patterns);
        let mut builder = GlobSetBuilder::new();
        for pattern in &patterns {
            let glob = GlobBuilder::new(pattern)
                .case_insensitive(!case.is_case_sensitive())
                .literal_separator(true)
                .build()?;
            builder.add(glob);
        }
        Ok(WildcardFilter {
            patterns,
            set: builder.build()?,
        })
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}

impl FileFilter for WildcardFilter {
    fn accept(&self, path: &Path) -> io::Result<bool> {
        Ok(path.file_name().is_some_and(|name| self.set.is_match(name)))
    }

    fn name(&self) -> &'static str {
        "wildcard"
    }
}

/// The whole file name must match the expression.
#[derive(Debug, Clone)]
pub struct RegexFilter {
    regex: Regex,
}

impl RegexFilter {
    pub fn new(pattern: &str, case: IoCase) -> Result<Self, regex::Error> {
        let regex = RegexBuilder::new(&format!("^(?:{})$", pattern))
            .case_insensitive(!case.is_case_sensitive())
            .build()?;
        Ok(RegexFilter { regex })
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

impl From<Regex> for RegexFilter {
    /// Uses `regex` as given, without anchoring it.
    fn from(regex: Regex) -> Self {
        RegexFilter { regex }
    }
}

impl FileFilter for RegexFilter {
    fn accept(&self, path: &Path) -> io::Result<bool> {
        Ok(file_name(path).is_some_and(|name| self.regex.is_match(&name)))
    }

    fn name(&self) -> &'static str {
        "regex"
    }
}
