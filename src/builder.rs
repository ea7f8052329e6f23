use std::path::PathBuf;

use crate::bind::Config;
use crate::dynamic::Document;
use crate::error::{Collector, GcfgError};
use crate::file::{self, SearchMode, SearchPath};
use crate::ops::{self, Action, Output};
use crate::read;
use crate::token::FileSet;

/// A named source and its raw contents.
pub type Source = (String, Vec<u8>);

/// Entry point for building a layered read.
pub struct Gcfg;

impl Gcfg {
    pub fn builder() -> GcfgBuilder {
        GcfgBuilder::new()
    }
}

/// Builder for reading several sources into one destination.
///
/// Sources are read in a fixed order, each on top of the previous ones:
///
/// 1. files discovered through [`search_paths()`](Self::search_paths), when
///    discovery is enabled by setting an app name, a file name or search paths;
/// 2. explicit [`file()`](Self::file)s, in the order added;
/// 3. in-memory [`text()`](Self::text) sources, in the order added.
///
/// Single-valued variables end with the last value read. Multi-valued ones
/// accumulate across sources.
#[derive(Debug, Clone)]
pub struct GcfgBuilder {
    app_name: Option<String>,
    file_name: Option<String>,
    search_paths: Option<Vec<SearchPath>>,
    search_mode: SearchMode,
    files: Vec<PathBuf>,
    texts: Vec<(String, String)>,
    strict: bool,
}

impl GcfgBuilder {
    fn new() -> Self {
        Self {
            app_name: None,
            file_name: None,
            search_paths: None,
            search_mode: SearchMode::default(),
            files: Vec::new(),
            texts: Vec::new(),
            strict: true,
        }
    }

    /// Set the application name. This derives sensible defaults:
    /// - `file_name` → `"{app_name}.gcfg"`
    /// - `search_paths` → `[SearchPath::Platform]`
    pub fn app_name(mut self, name: &str) -> Self {
        self.app_name = Some(name.to_string());
        self
    }

    /// Override the config file name (default: `"{app_name}.gcfg"`).
    pub fn file_name(mut self, name: &str) -> Self {
        self.file_name = Some(name.to_string());
        self
    }

    /// Replace the default search paths entirely.
    ///
    /// Paths are listed in **priority-ascending** order: the last entry has the
    /// highest priority.
    pub fn search_paths(mut self, paths: Vec<SearchPath>) -> Self {
        self.search_paths = Some(paths);
        self
    }

    /// Append a search path without replacing the defaults.
    /// If no paths have been set yet, starts from the default `[Platform]`.
    pub fn add_search_path(mut self, path: SearchPath) -> Self {
        self.search_paths
            .get_or_insert_with(|| vec![SearchPath::Platform])
            .push(path);
        self
    }

    /// Set the search mode (default: [`SearchMode::Merge`]).
    pub fn search_mode(mut self, mode: SearchMode) -> Self {
        self.search_mode = mode;
        self
    }

    /// Read a file after the discovered ones. Unlike discovered files, it must
    /// exist.
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.files.push(path.into());
        self
    }

    /// Read `text` last. `name` shows up in error positions.
    pub fn text(mut self, name: &str, text: &str) -> Self {
        self.texts.push((name.to_string(), text.to_string()));
        self
    }

    /// Enable or disable strict mode (default: `true`).
    ///
    /// In strict mode, data with no destination ends the read with
    /// [`GcfgError::Warnings`], after every source has been applied. Otherwise
    /// it is logged and dropped.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Resolve the effective app name, or error if not set.
    fn effective_app_name(&self) -> Result<&str, GcfgError> {
        self.app_name.as_deref().ok_or(GcfgError::AppNameRequired)
    }

    /// Resolve the effective file name.
    fn effective_file_name(&self) -> Result<String, GcfgError> {
        if let Some(name) = &self.file_name {
            return Ok(name.clone());
        }
        let app = self.effective_app_name()?;
        Ok(format!("{app}.gcfg"))
    }

    /// Resolve the effective search paths.
    fn effective_search_paths(&self) -> Vec<SearchPath> {
        if let Some(paths) = &self.search_paths {
            return paths.clone();
        }
        vec![SearchPath::Platform]
    }

    fn discovery_enabled(&self) -> bool {
        self.app_name.is_some() || self.file_name.is_some() || self.search_paths.is_some()
    }

    fn discover(&self) -> Result<Vec<file::Found>, GcfgError> {
        if !self.discovery_enabled() {
            return Ok(Vec::new());
        }
        let file_name = self.effective_file_name()?;
        let search_paths = self.effective_search_paths();
        // only the platform directory is derived from the app name
        let app_name = if search_paths.contains(&SearchPath::Platform) {
            self.effective_app_name()?
        } else {
            self.app_name.as_deref().unwrap_or_default()
        };
        file::load_config_files(&search_paths, &file_name, app_name, self.search_mode)
    }

    /// Every source, in reading order.
    fn sources(&self) -> Result<Vec<Source>, GcfgError> {
        let mut sources = Vec::new();
        for (path, bytes) in self.discover()? {
            sources.push((path.display().to_string(), bytes));
        }
        for path in &self.files {
            let (path, bytes) = file::read_required(path.clone())?;
            sources.push((path.display().to_string(), bytes));
        }
        for (name, text) in &self.texts {
            sources.push((name.clone(), text.clone().into_bytes()));
        }
        Ok(sources)
    }

    /// Read every source into `config`.
    ///
    /// Fatal errors stop the read at once, leaving whatever was stored before
    /// them in place.
    pub fn read_into<C: Config + ?Sized>(&self, config: &mut C) -> Result<(), GcfgError> {
        let sources = self.sources()?;
        log::debug!("reading {} source(s)", sources.len());

        let mut fset = FileSet::new();
        let mut collector = Collector::new(self.strict);
        for (name, bytes) in &sources {
            read::read_bytes(config, &mut fset, name, bytes, &mut collector)?;
        }
        collector.finish()
    }

    /// Read every source into a default-valued `C`.
    pub fn load<C: Config + Default>(self) -> Result<C, GcfgError> {
        let mut config = C::default();
        self.read_into(&mut config)?;
        Ok(config)
    }

    /// Handle an [`Action`] and print the result to stdout.
    pub fn handle_and_print(&self, action: &Action) -> Result<(), GcfgError> {
        let output = self.handle(action)?;
        println!("{output}");
        Ok(())
    }

    /// Handle an [`Action`] (list / get / events / tokens) over the sources.
    pub fn handle(&self, action: &Action) -> Result<Output, GcfgError> {
        match action {
            Action::List => {
                let mut doc = Document::new();
                self.read_into(&mut doc)?;
                Ok(ops::list(&doc))
            }
            Action::Get { key, all } => {
                let mut doc = Document::new();
                self.read_into(&mut doc)?;
                ops::get(&doc, key, *all)
            }
            Action::Events => ops::events(&self.sources()?),
            Action::Tokens => ops::tokens(&self.sources()?),
        }
    }
}
