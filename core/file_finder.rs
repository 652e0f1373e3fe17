use crate::error::IoErrorList;
use crate::filter::{
    AgeFilter, AndFilter, EmptyFilter, EntryKind, FileFilter, FileFilterExt, HiddenFilter, IoCase,
    KindFilter, MagicNumberFilter, NameFilter, PrefixFilter, RegexFilter, SizeFilter,
    SuffixFilter, TrueFilter, WildcardFilter,
};
use crate::for_all;
use crate::stream::IoStream;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ignore::WalkBuilder;
use ignore::overrides::OverrideBuilder;
use std::cell::RefCell;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, trace, warn};
use walkdir::WalkDir;

#[derive(Debug, Parser, Clone)]
#[clap(
    version = "0.1.0",
    about = "Select files with composable filters (main arguments)",
    long_about = "These are the main arguments for selecting files and acting on them."
)]
pub struct IokitArgs {
    #[clap(help = "Directory (or file) to search", default_value = ".")]
    pub path: PathBuf,

    #[clap(long, value_name = "NAME", help = "Exact file name [multiple allowed]", action = clap::ArgAction::Append)]
    pub name: Vec<String>,
    #[clap(long, value_name = "PREFIX", help = "File name prefix [multiple allowed]", action = clap::ArgAction::Append)]
    pub prefix: Vec<String>,
    #[clap(long, value_name = "SUFFIX", help = "File name suffix [multiple allowed]", action = clap::ArgAction::Append)]
    pub suffix: Vec<String>,
    #[clap(long, value_name = "WILDCARD", help = "File name wildcard using * and ? [multiple allowed]", action = clap::ArgAction::Append)]
    pub glob: Vec<String>,
    #[clap(long, value_name = "REGEX", help = "Regular expression the whole file name must match")]
    pub regex: Option<String>,
    #[clap(short = 'i', long, help = "Match names case-insensitively")]
    pub ignore_case: bool,

    #[clap(long, value_name = "BYTES", help = "Only files at least this large")]
    pub min_size: Option<u64>,
    #[clap(long, value_name = "BYTES", help = "Only files smaller than this")]
    pub max_size: Option<u64>,
    #[clap(long, value_name = "SECS", help = "Only entries modified within the last SECS seconds")]
    pub newer_than: Option<u64>,
    #[clap(long, value_name = "SECS", help = "Only entries last modified at least SECS seconds ago")]
    pub older_than: Option<u64>,
    #[clap(long, help = "Only empty files and empty directories")]
    pub empty: bool,
    #[clap(long, help = "Only hidden (dot) entries")]
    pub hidden: bool,
    #[clap(long = "type", value_enum, value_name = "KIND", help = "Entry kind to select [default: regular files]")]
    pub kind: Option<EntryKind>,
    #[clap(long, value_name = "HEX", help = "Only files starting with these bytes, e.g. 7f454c46")]
    pub magic: Option<String>,
    #[clap(long, value_name = "BYTES", default_value_t = 0, requires = "magic", help = "Where the magic bytes start")]
    pub magic_offset: u64,

    #[clap(long, value_name = "PATTERN", help = "Glob pattern for files to include [multiple allowed]", action = clap::ArgAction::Append)]
    pub include: Vec<String>,
    #[clap(long, value_name = "PATTERN", help = "Glob pattern for files/directories to exclude [multiple allowed]", action = clap::ArgAction::Append)]
    pub exclude: Vec<String>,
    #[clap(long, help = "Do not honor .gitignore and other ignore files")]
    pub no_ignore: bool,
    #[clap(long, value_name = "N", help = "Descend at most N directories below the root")]
    pub max_depth: Option<usize>,
    #[clap(long, help = "Fail when any entry cannot be read or tested")]
    pub strict: bool,

    #[clap(long, help = "Print the total size of the matches", group = "action")]
    pub count: bool,
    #[clap(long, help = "Delete the matches", group = "action")]
    pub delete: bool,
    #[clap(long, help = "List every match instead of the first ten")]
    pub all_matches: bool,
    #[clap(long, help = "Skip the confirmation prompt")]
    pub no_confirm: bool,
    #[clap(short, long, action = clap::ArgAction::Count, help = "More log output (-v, -vv, -vvv)")]
    pub verbose: u8,
}

impl Default for IokitArgs {
    fn default() -> Self {
        IokitArgs {
            path: PathBuf::from("."),
            name: Vec::new(),
            prefix: Vec::new(),
            suffix: Vec::new(),
            glob: Vec::new(),
            regex: None,
            ignore_case: false,
            min_size: None,
            max_size: None,
            newer_than: None,
            older_than: None,
            empty: false,
            hidden: false,
            kind: None,
            magic: None,
            magic_offset: 0,
            include: Vec::new(),
            exclude: Vec::new(),
            no_ignore: false,
            max_depth: None,
            strict: false,
            count: false,
            delete: false,
            all_matches: false,
            no_confirm: false,
            verbose: 0,
        }
    }
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    #[clap(about = "Generate shell completion scripts")]
    Completion(CompletionArgs),
}

#[derive(Debug, Parser, Clone)]
pub struct CompletionArgs {
    #[clap(value_parser = clap::value_parser!(clap_complete::Shell))]
    pub shell: clap_complete::Shell,
}

#[derive(Debug, Parser, Clone)]
#[clap(
    name = "iokit",
    version = "0.1.0",
    about = "Select files with composable filters",
    long_about = "Walks a directory, selects entries by name, size, age, kind, permissions or magic bytes,\nthen lists, counts or deletes them. Unreadable entries are reported, not fatal.",
    propagate_version = true
)]
pub struct CliArgs {
    #[clap(subcommand)]
    pub command: Option<Command>,

    #[clap(flatten)]
    pub main_opts: IokitArgs,
}

/// Outcome of [`find_files`].
#[derive(Debug, Default)]
pub struct FindReport {
    pub files: Vec<PathBuf>,
    /// Entries that could not be walked or tested, by walk position.
    pub skipped: Option<IoErrorList>,
}

/// Conjunction of every selector set in `args`; [`TrueFilter`] when none is.
pub fn build_filter(args: &IokitArgs) -> Result<Box<dyn FileFilter>> {
    let case = if args.ignore_case {
        IoCase::Insensitive
    } else {
        IoCase::Sensitive
    };
    let mut all = AndFilter::default();

    if !args.name.is_empty() {
        all.push(NameFilter::new(args.name.iter().cloned()).with_case(case));
    }
    if !args.prefix.is_empty() {
        all.push(PrefixFilter::new(args.prefix.iter().cloned()).with_case(case));
    }
    if !args.suffix.is_empty() {
        all.push(SuffixFilter::new(args.suffix.iter().cloned()).with_case(case));
    }
    if !args.glob.is_empty() {
        let glob = WildcardFilter::new(args.glob.iter().cloned(), case)
            .with_context(|| format!("Glob: {:?}", args.glob))?;
        all.push(glob);
    }
    if let Some(pattern) = &args.regex {
        let regex = RegexFilter::new(pattern, case).with_context(|| format!("Regex: {}", pattern))?;
        all.push(regex);
    }
    match (args.min_size, args.max_size) {
        (Some(min), Some(max)) if min >= max => {
            anyhow::bail!("--min-size ({}) must be below --max-size ({})", min, max)
        }
        (Some(min), Some(max)) => all.push(SizeFilter::range(min, max)),
        (Some(min), None) => all.push(SizeFilter::at_least(min)),
        (None, Some(max)) => all.push(SizeFilter::smaller_than(max)),
        (None, None) => {}
    }
    if let Some(secs) = args.newer_than {
        all.push(AgeFilter::newer_than_ago(Duration::from_secs(secs)));
    }
    if let Some(secs) = args.older_than {
        all.push(AgeFilter::older_than_ago(Duration::from_secs(secs)));
    }
    if args.empty {
        all.push(EmptyFilter);
    }
    if args.hidden {
        all.push(HiddenFilter);
    }
    if let Some(kind) = args.kind {
        all.push(KindFilter::new(kind));
    }
    if let Some(hex) = &args.magic {
        let magic = MagicNumberFilter::from_hex(hex).with_context(|| format!("Magic: {}", hex))?;
        all.push(magic.with_offset(args.magic_offset));
    }

    if all.is_empty() {
        return Ok(TrueFilter.boxed());
    }
    debug!(selectors = all.len(), "built filter");
    Ok(all.boxed())
}

fn walk_error(e: ignore::Error) -> io::Error {
    let kind = e.io_error().map_or(io::ErrorKind::Other, io::Error::kind);
    io::Error::new(kind, e)
}

/// Unreadable entries land in [`FindReport::skipped`], or fail the search
/// under `--strict`.
pub fn find_files(args: &IokitArgs) -> Result<FindReport> {
    let root = &args.path;
    if !root.exists() {
        anyhow::bail!("Path not found: {}", root.display());
    }
    let filter = build_filter(args)?;

    let mut walker = WalkBuilder::new(root);
    walker.standard_filters(!args.no_ignore);
    walker.hidden(false);
    walker.max_depth(args.max_depth);
    let mut overrides = OverrideBuilder::new(root);
    for p in &args.exclude {
        let q = format!("!{}", p);
        overrides.add(&q).with_context(|| format!("Exclude: {}", p))?;
    }
    for p in &args.include {
        overrides.add(p).with_context(|| format!("Include: {}", p))?;
    }
    walker.overrides(overrides.build().context("Overrides")?);
    debug!(root = %root.display(), filter = filter.name(), "walking");

    let files = RefCell::new(Vec::new());
    let visit = |entry: Result<ignore::DirEntry, ignore::Error>| -> io::Result<()> {
        let entry = entry.map_err(walk_error)?;
        let is_candidate = match args.kind {
            Some(_) => entry.depth() > 0,
            None => entry.file_type().is_some_and(|ft| ft.is_file()),
        };
        if !is_candidate {
            return Ok(());
        }
        if filter.accept(entry.path())? {
            files.borrow_mut().push(entry.into_path());
        } else {
            trace!(path = %entry.path().display(), "rejected");
        }
        Ok(())
    };
    let skipped = for_all::for_all(walker.build(), visit).err();

    if let Some(list) = &skipped {
        for e in list.iter() {
            warn!("Skipped entry {}", e);
        }
    }
    if args.strict {
        if let Some(list) = skipped {
            return Err(anyhow::Error::new(list).context("Strict search hit unreadable entries"));
        }
    }

    let mut files = files.into_inner();
    files.sort();
    Ok(FindReport { files, skipped })
}

/// Fail-fast listing of the files under `dir` accepted by `filter`, sorted by
/// name within each directory. The first unreadable entry ends the listing.
pub fn list_files<F>(dir: &Path, filter: &F, max_depth: Option<usize>) -> io::Result<Vec<PathBuf>>
where
    F: FileFilter + ?Sized,
{
    let mut walker = WalkDir::new(dir).min_depth(1).sort_by_file_name();
    if let Some(depth) = max_depth {
        walker = walker.max_depth(depth);
    }
    let mut matches = IoStream::from_results(walker.into_iter().map(|r| r.map_err(io::Error::from)))
        .filter(|entry: &walkdir::DirEntry| -> io::Result<bool> { Ok(entry.file_type().is_file()) })
        .map(|entry: walkdir::DirEntry| -> io::Result<PathBuf> { Ok(entry.into_path()) })
        .filter(|path: &PathBuf| filter.accept(path));
    matches.collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn tree() -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("src/nested")).unwrap();
        fs::create_dir_all(root.join("target")).unwrap();
        fs::write(root.join("Cargo.toml"), "[package]\n").unwrap();
        fs::write(root.join("src/lib.rs"), "pub fn x() {}\n").unwrap();
        fs::write(root.join("src/nested/deep.rs"), "").unwrap();
        fs::write(root.join("src/notes.TXT"), "n").unwrap();
        fs::write(root.join("target/out.rs"), "// built").unwrap();
        fs::write(root.join(".hidden.rs"), "h").unwrap();
        dir
    }

    fn args_for(dir: &TempDir) -> IokitArgs {
        IokitArgs {
            path: dir.path().to_path_buf(),
            ..IokitArgs::default()
        }
    }

    fn names(files: &[PathBuf]) -> Vec<String> {
        files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn no_selectors_means_everything() {
        let filter = build_filter(&IokitArgs::default()).unwrap();
        assert_eq!(filter.name(), "true");
    }

    #[test]
    fn invalid_selectors_are_reported() {
        let bad_regex = IokitArgs {
            regex: Some("(".into()),
            ..IokitArgs::default()
        };
        assert!(build_filter(&bad_regex).is_err());

        let bad_sizes = IokitArgs {
            min_size: Some(10),
            max_size: Some(10),
            ..IokitArgs::default()
        };
        let msg = build_filter(&bad_sizes).err().unwrap().to_string();
        assert!(msg.contains("--min-size"));

        let bad_magic = IokitArgs {
            magic: Some("xyz".into()),
            ..IokitArgs::default()
        };
        assert!(build_filter(&bad_magic).is_err());
    }

    #[test]
    fn finds_by_suffix_including_hidden() {
        let dir = tree();
        let args = IokitArgs {
            suffix: vec![".rs".into()],
            ..args_for(&dir)
        };
        let report = find_files(&args).unwrap();
        assert!(report.skipped.is_none());
        let mut found = names(&report.files);
        found.sort();
        assert_eq!(found, vec![".hidden.rs", "deep.rs", "lib.rs", "out.rs"]);
    }

    #[test]
    fn exclude_and_case_options() {
        let dir = tree();
        let args = IokitArgs {
            glob: vec!["*.txt".into(), "*.rs".into()],
            ignore_case: true,
            exclude: vec!["target/".into(), ".*".into()],
            ..args_for(&dir)
        };
        let mut found = names(&find_files(&args).unwrap().files);
        found.sort();
        assert_eq!(found, vec!["deep.rs", "lib.rs", "notes.TXT"]);
    }

    #[test]
    fn depth_limit_and_kind() {
        let dir = tree();
        let args = IokitArgs {
            max_depth: Some(1),
            kind: Some(EntryKind::Directory),
            ..args_for(&dir)
        };
        let found = names(&find_files(&args).unwrap().files);
        assert_eq!(found, vec!["src", "target"]);
    }

    #[test]
    fn empty_files_only() {
        let dir = tree();
        let args = IokitArgs {
            empty: true,
            ..args_for(&dir)
        };
        assert_eq!(names(&find_files(&args).unwrap().files), vec!["deep.rs"]);
    }

    #[test]
    fn missing_root_is_an_error() {
        let dir = tree();
        let args = IokitArgs {
            path: dir.path().join("absent"),
            ..IokitArgs::default()
        };
        let msg = find_files(&args).err().unwrap().to_string();
        assert!(msg.starts_with("Path not found"));
    }

    #[test]
    fn list_files_is_sorted_and_bounded() {
        let dir = tree();
        let all = list_files(dir.path(), &SuffixFilter::new([".rs"]), None).unwrap();
        assert_eq!(names(&all), vec![".hidden.rs", "lib.rs", "deep.rs", "out.rs"]);

        let shallow = list_files(dir.path(), &TrueFilter, Some(1)).unwrap();
        assert_eq!(names(&shallow), vec![".hidden.rs", "Cargo.toml"]);
    }

    #[test]
    fn list_files_fails_fast() {
        let dir = tree();
        let e = list_files(&dir.path().join("absent"), &TrueFilter, None).unwrap_err();
        assert_eq!(e.kind(), io::ErrorKind::NotFound);
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_entries_are_skipped_or_fatal() {
        let dir = tree();
        let dangling = dir.path().join("src/gone.rs");
        std::os::unix::fs::symlink(dir.path().join("nowhere"), &dangling).unwrap();
        let args = IokitArgs {
            kind: Some(EntryKind::Symlink),
            min_size: Some(0),
            ..args_for(&dir)
        };

        let report = find_files(&args).unwrap();
        assert!(report.files.is_empty());
        let skipped = report.skipped.unwrap();
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped.cause(0).unwrap().kind(), io::ErrorKind::NotFound);

        let strict = IokitArgs { strict: true, ..args };
        assert!(find_files(&strict).is_err());
    }
}
