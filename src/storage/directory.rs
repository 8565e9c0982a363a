//! A filesystem backed catalog
//!
//! The [`Directory`] keeps a catalog in four flat files, one per record type.
//! It is a wrapper around the filesystem agnostic [`Catalog`]: every successful
//! mutation rewrites the affected backing files in full.

use std::{
    fmt,
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use chrono::{Local, NaiveDate};
use nonempty::NonEmpty;
use tracing::instrument;

use crate::{
    domain::{
        BorrowingId, Catalog, Config, Item, ItemKind, Library, Member, Rejection,
    },
    storage::record::{MalformedRecord, Record},
};

/// A directory whose records are in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loaded {
    catalog: Catalog,
    config: Config,
}

/// A directory whose records have not been read yet.
#[derive(Debug, PartialEq, Eq)]
pub struct Unloaded;

/// A filesystem backed catalog.
#[derive(Debug)]
pub struct Directory<S> {
    /// The root of the catalog; holds the config file and the data directory.
    root: PathBuf,
    state: S,
}

/// The four record collections, each kept in its own file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Collection {
    Libraries,
    Items,
    Members,
    Borrowings,
}

impl Collection {
    const ALL: [Self; 4] = [Self::Libraries, Self::Items, Self::Members, Self::Borrowings];

    fn path(self, root: &Path, config: &Config) -> PathBuf {
        let file = match self {
            Self::Libraries => &config.libraries_file,
            Self::Items => &config.items_file,
            Self::Members => &config.members_file,
            Self::Borrowings => &config.borrowings_file,
        };
        root.join(config.data_dir()).join(file)
    }
}

impl Directory<Unloaded> {
    /// Opens a directory at the given path.
    #[must_use]
    pub const fn new(root: PathBuf) -> Self {
        Self {
            root,
            state: Unloaded,
        }
    }

    /// Prepares the root for use.
    ///
    /// Writes a default config file if none exists, creates the data
    /// directory, and creates any missing backing file empty. Existing files
    /// are left untouched. Returns the paths that were created.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory or file cannot be created.
    pub fn init(&self) -> io::Result<Vec<PathBuf>> {
        let mut created = Vec::new();

        let config_path = self.root.join(Config::FILE_NAME);
        if !config_path.exists() {
            fs::create_dir_all(&self.root)?;
            Config::default().save(&config_path).map_err(io::Error::other)?;
            created.push(config_path);
        }

        let config = load_config(&self.root);
        fs::create_dir_all(self.root.join(config.data_dir()))?;

        for collection in Collection::ALL {
            let path = collection.path(&self.root, &config);
            if !path.exists() {
                File::create(&path)?;
                created.push(path);
            }
        }

        tracing::info!("Initialised catalog in {}", self.root.display());
        Ok(created)
    }

    /// Load all records from disk.
    ///
    /// Loading is all-or-nothing: if any backing file cannot be read, or any
    /// line of any file is malformed, no directory is produced. Blank lines
    /// are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::StorageUnavailable`] if a backing file cannot be
    /// read, or [`LoadError::Malformed`] if a line cannot be decoded.
    #[instrument(level = "debug", skip(self), fields(root = %self.root.display()))]
    pub fn load_all(self) -> Result<Directory<Loaded>, LoadError> {
        let config = load_config(&self.root);
        let path = |collection: Collection| collection.path(&self.root, &config);

        let libraries = load_collection(&path(Collection::Libraries))?;
        let items = load_collection(&path(Collection::Items))?;
        let members = load_collection(&path(Collection::Members))?;
        let borrowings = load_collection(&path(Collection::Borrowings))?;

        let catalog = Catalog::from_parts(libraries, items, members, borrowings);
        tracing::debug!(
            "Loaded {} libraries, {} items, {} members, {} borrowings",
            catalog.libraries().len(),
            catalog.items().len(),
            catalog.members().len(),
            catalog.borrowings().len()
        );

        Ok(Directory {
            root: self.root,
            state: Loaded { catalog, config },
        })
    }
}

/// Failure to load the catalog from disk.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// A backing file is missing or unreadable.
    #[error("cannot read {}: {source}", path.display())]
    StorageUnavailable {
        /// The backing file.
        path: PathBuf,
        /// The underlying I/O error.
        source: io::Error,
    },
    /// A line of a backing file does not hold a valid record.
    #[error("{}:{line}: {source}", path.display())]
    Malformed {
        /// The backing file.
        path: PathBuf,
        /// The 1-based line number.
        line: usize,
        /// What is wrong with the line.
        source: MalformedRecord,
    },
}

/// Failure to write a backing file.
#[derive(Debug, thiserror::Error)]
#[error("failed to write {}: {source}", path.display())]
pub struct SaveError {
    /// The backing file.
    pub path: PathBuf,
    /// The underlying I/O error.
    pub source: io::Error,
}

/// Failure of a catalog operation on a [`Directory`].
///
/// A [`Rejection`](Self::Rejected) is an expected outcome and leaves both
/// memory and disk unchanged. A [`Storage`](Self::Storage) failure means the
/// change was applied in memory but could not be written.
#[derive(Debug, thiserror::Error)]
pub enum OperationError {
    /// The operation broke a catalog rule.
    #[error(transparent)]
    Rejected(#[from] Rejection),
    /// The change could not be persisted.
    #[error(transparent)]
    Storage(#[from] SaveError),
}

impl OperationError {
    /// Returns `true` if this is an expected rejection rather than an I/O
    /// failure.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }

    /// Returns the rejection, if this is one.
    #[must_use]
    pub const fn rejection(&self) -> Option<&Rejection> {
        match self {
            Self::Rejected(rejection) => Some(rejection),
            Self::Storage(_) => None,
        }
    }
}

fn load_config(root: &Path) -> Config {
    let path = root.join(Config::FILE_NAME);
    Config::load(&path).unwrap_or_else(|e| {
        tracing::debug!("Failed to load config: {e}");
        Config::default()
    })
}

fn load_collection<R: Record>(path: &Path) -> Result<Vec<R>, LoadError> {
    let content = fs::read_to_string(path).map_err(|source| LoadError::StorageUnavailable {
        path: path.to_path_buf(),
        source,
    })?;

    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            R::decode(line).map_err(|source| LoadError::Malformed {
                path: path.to_path_buf(),
                line: index + 1,
                source,
            })
        })
        .collect()
}

fn save_collection<R: Record>(path: &Path, records: &[R]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut writer = BufWriter::new(File::create(path)?);
    for record in records {
        writeln!(writer, "{}", record.encode())?;
    }
    writer.flush()?;

    tracing::debug!("Wrote {} record(s) to {}", records.len(), path.display());
    Ok(())
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

impl Directory<Loaded> {
    /// The in-memory catalog.
    ///
    /// All lookups and listings go through the catalog.
    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.state.catalog
    }

    fn save(&self, collection: Collection) -> Result<(), SaveError> {
        let path = collection.path(&self.root, &self.state.config);
        let catalog = &self.state.catalog;
        let result = match collection {
            Collection::Libraries => save_collection(&path, catalog.libraries()),
            Collection::Items => save_collection(&path, catalog.items()),
            Collection::Members => save_collection(&path, catalog.members()),
            Collection::Borrowings => save_collection(&path, catalog.borrowings()),
        };
        result.map_err(|source| SaveError { path, source })
    }

    /// Rewrites the library file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save_libraries(&self) -> Result<(), SaveError> {
        self.save(Collection::Libraries)
    }

    /// Rewrites the item file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save_items(&self) -> Result<(), SaveError> {
        self.save(Collection::Items)
    }

    /// Rewrites the member file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save_members(&self) -> Result<(), SaveError> {
        self.save(Collection::Members)
    }

    /// Rewrites the borrowing file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save_borrowings(&self) -> Result<(), SaveError> {
        self.save(Collection::Borrowings)
    }

    /// Rewrites every backing file.
    ///
    /// # Errors
    ///
    /// This method does *not* fail fast. It attempts to write every file and
    /// then reports all the files that could not be written.
    pub fn save_all(&self) -> Result<(), SaveAllError> {
        let failures: Vec<_> = Collection::ALL
            .into_iter()
            .filter_map(|collection| self.save(collection).err())
            .map(|SaveError { path, source }| (path, source))
            .collect();

        NonEmpty::from_vec(failures).map_or(Ok(()), |failures| Err(SaveAllError { failures }))
    }

    /// Adds a library.
    ///
    /// # Errors
    ///
    /// Fails if the library ID is taken or a field cannot be stored, or if the
    /// library file cannot be written.
    pub fn add_library(&mut self, library: Library) -> Result<(), OperationError> {
        let id = library.id.clone();
        self.state.catalog.add_library(library)?;
        self.save_libraries()?;
        tracing::info!("Added library: {id}");
        Ok(())
    }

    /// Renames a library.
    ///
    /// # Errors
    ///
    /// Fails if the library does not exist or the name cannot be stored, or if
    /// the library file cannot be written.
    pub fn edit_library(&mut self, id: &str, name: String) -> Result<(), OperationError> {
        self.state.catalog.edit_library(id, name)?;
        self.save_libraries()?;
        tracing::info!("Edited library: {id}");
        Ok(())
    }

    /// Deletes a library and every item it holds, returning the removed items.
    ///
    /// Borrowings are kept.
    ///
    /// # Errors
    ///
    /// Fails if the library does not exist, or if the library or item file
    /// cannot be written.
    pub fn delete_library(&mut self, id: &str) -> Result<Vec<Item>, OperationError> {
        let removed = self.state.catalog.delete_library(id)?;
        self.save_libraries()?;
        self.save_items()?;
        tracing::info!("Deleted library {id} and {} item(s)", removed.len());
        Ok(removed)
    }

    /// Adds an item.
    ///
    /// # Errors
    ///
    /// Fails if the item ID is taken or a field cannot be stored, or if the
    /// item file cannot be written.
    pub fn add_item(&mut self, item: Item) -> Result<(), OperationError> {
        let id = item.id.clone();
        self.state.catalog.add_item(item)?;
        self.save_items()?;
        tracing::info!("Added item: {id}");
        Ok(())
    }

    /// Replaces the library, name and kind of an item.
    ///
    /// # Errors
    ///
    /// Fails if the item does not exist or a field cannot be stored, or if the
    /// item file cannot be written.
    pub fn edit_item(
        &mut self,
        id: &str,
        library_id: String,
        name: String,
        kind: ItemKind,
    ) -> Result<(), OperationError> {
        self.state.catalog.edit_item(id, library_id, name, kind)?;
        self.save_items()?;
        tracing::info!("Edited item: {id}");
        Ok(())
    }

    /// Deletes an item, returning it.
    ///
    /// # Errors
    ///
    /// Fails if the item does not exist, or if the item file cannot be
    /// written.
    pub fn delete_item(&mut self, id: &str) -> Result<Item, OperationError> {
        let removed = self.state.catalog.delete_item(id)?;
        self.save_items()?;
        tracing::info!("Deleted item: {id}");
        Ok(removed)
    }

    /// Adds a member.
    ///
    /// # Errors
    ///
    /// Fails if the member ID is taken or a field cannot be stored, or if the
    /// member file cannot be written.
    pub fn add_member(&mut self, member: Member) -> Result<(), OperationError> {
        let id = member.id.clone();
        self.state.catalog.add_member(member)?;
        self.save_members()?;
        tracing::info!("Added member: {id}");
        Ok(())
    }

    /// Replaces the name and email of a member.
    ///
    /// # Errors
    ///
    /// Fails if the member does not exist or a field cannot be stored, or if
    /// the member file cannot be written.
    pub fn edit_member(
        &mut self,
        id: &str,
        first_name: String,
        last_name: String,
        email: String,
    ) -> Result<(), OperationError> {
        self.state
            .catalog
            .edit_member(id, first_name, last_name, email)?;
        self.save_members()?;
        tracing::info!("Edited member: {id}");
        Ok(())
    }

    /// Deletes a member, returning it. Their borrowings are kept.
    ///
    /// # Errors
    ///
    /// Fails if the member does not exist, or if the member file cannot be
    /// written.
    pub fn delete_member(&mut self, id: &str) -> Result<Member, OperationError> {
        let removed = self.state.catalog.delete_member(id)?;
        self.save_members()?;
        tracing::info!("Deleted member: {id}");
        Ok(removed)
    }

    /// Lends an item to a member as of today, returning the new borrowing ID.
    ///
    /// # Errors
    ///
    /// Fails if the member already holds the item, or if the borrowing file
    /// cannot be written.
    pub fn borrow_item(
        &mut self,
        item_id: &str,
        member_id: &str,
    ) -> Result<BorrowingId, OperationError> {
        let id = self.state.catalog.borrow_item(item_id, member_id, today())?;
        self.save_borrowings()?;
        tracing::info!("Member {member_id} borrowed item {item_id} (borrowing {id})");
        Ok(id)
    }

    /// Marks a borrowing as returned today.
    ///
    /// # Errors
    ///
    /// Fails if the borrowing does not exist or was already returned, or if
    /// the borrowing file cannot be written.
    pub fn return_item(&mut self, id: BorrowingId) -> Result<(), OperationError> {
        self.state.catalog.return_item(id, today())?;
        self.save_borrowings()?;
        tracing::info!("Borrowing {id} returned");
        Ok(())
    }
}

/// Failure to write one or more backing files during [`Directory::save_all`].
#[derive(Debug, thiserror::Error)]
pub struct SaveAllError {
    failures: NonEmpty<(PathBuf, io::Error)>,
}

impl SaveAllError {
    /// The files that could not be written, with the reason for each.
    pub fn failures(&self) -> impl Iterator<Item = (&Path, &io::Error)> {
        self.failures
            .iter()
            .map(|(path, error)| (path.as_path(), error))
    }
}

impl fmt::Display for SaveAllError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to save catalog: ")?;

        let paths: Vec<String> = self
            .failures
            .iter()
            .map(|(path, _)| path.display().to_string())
            .collect();

        write!(f, "{}", paths.join(", "))
    }
}
