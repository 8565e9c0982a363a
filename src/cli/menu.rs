//! The interactive menu.
//!
//! Administrators manage libraries and their items. Members borrow items and
//! return them. Every screen returns the next screen to show; the session
//! records who is logged in and which library is open.

use std::path::PathBuf;

use catalog::{storage::Loaded, Directory, Item, ItemType, Library, Member, OperationError};
use tracing::instrument;

use crate::cli::terminal::{say, Tone};

mod prompt;
mod session;

use session::{Role, Session};

#[derive(Debug, clap::Parser, Default)]
pub struct Menu {}

impl Menu {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let directory = Directory::new(root).load_all().map_err(|e| {
            anyhow::anyhow!("{e}\nRun 'catalog init' to create any missing data files")
        })?;

        Runner {
            directory,
            session: Session::default(),
        }
        .run()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Login,
    MemberLogin,
    Libraries,
    Library,
    Items(ItemType),
    Borrowings,
    Exit,
}

struct Runner {
    directory: Directory<Loaded>,
    session: Session,
}

/// Shows `options` by label and returns the value of the chosen one.
fn pick<A: Clone>(prompt: &str, options: &[(String, A)]) -> dialoguer::Result<A> {
    let labels: Vec<&str> = options.iter().map(|(label, _)| label.as_str()).collect();
    let index = prompt::choose(prompt, &labels)?;
    Ok(options[index].1.clone())
}

/// Prints the outcome of a catalog operation.
///
/// Rejections are reported and swallowed so the user can try again; storage
/// failures end the session.
fn report<T>(result: Result<T, OperationError>) -> anyhow::Result<Option<T>> {
    match result {
        Ok(value) => {
            say(Tone::Success, "✅ Operation was successful");
            Ok(Some(value))
        }
        Err(OperationError::Rejected(rejection)) => {
            say(
                Tone::Warning,
                format!("⚠️  Operation was not successful: {rejection}"),
            );
            Ok(None)
        }
        Err(OperationError::Storage(error)) => Err(error.into()),
    }
}

const fn heading(item_type: ItemType) -> &'static str {
    match item_type {
        ItemType::Book => "Books",
        ItemType::Article => "Articles",
        ItemType::DigitalMedia => "Digital Media",
    }
}

const fn plural(item_type: ItemType) -> &'static str {
    match item_type {
        ItemType::Book => "books",
        ItemType::Article => "articles",
        ItemType::DigitalMedia => "digital media",
    }
}

fn singular(item_type: ItemType) -> String {
    item_type.as_str().to_lowercase()
}

impl Runner {
    fn run(mut self) -> anyhow::Result<()> {
        let mut screen = Screen::Login;
        while screen != Screen::Exit {
            tracing::trace!("Showing {screen:?}");
            println!();
            screen = match screen {
                Screen::Login => self.login()?,
                Screen::MemberLogin => self.member_login()?,
                Screen::Libraries => self.libraries()?,
                Screen::Library => self.library()?,
                Screen::Items(item_type) => self.items(item_type)?,
                Screen::Borrowings => self.borrowings()?,
                Screen::Exit => Screen::Exit,
            };
        }

        println!();
        println!("You have exited the program.");
        Ok(())
    }

    fn login(&mut self) -> anyhow::Result<Screen> {
        println!(
            "An administrator can modify library data. \
             A member can only borrow/return library items."
        );
        let next = pick(
            "What would you like to do?",
            &[
                ("Log in as an administrator".to_string(), Screen::Libraries),
                ("Log in as a member".to_string(), Screen::MemberLogin),
                ("Exit program".to_string(), Screen::Exit),
            ],
        )?;

        if next == Screen::Libraries {
            self.session.log_in(Role::Admin);
        }
        Ok(next)
    }

    fn member_login(&mut self) -> anyhow::Result<Screen> {
        #[derive(Clone, Copy)]
        enum Action {
            Create,
            Existing,
            Back,
            Exit,
        }

        let action = pick(
            "What would you like to do?",
            &[
                ("Create your member profile".to_string(), Action::Create),
                ("Use an existing member profile".to_string(), Action::Existing),
                ("Go back to the main menu".to_string(), Action::Back),
                ("Exit program".to_string(), Action::Exit),
            ],
        )?;

        match action {
            Action::Create => {
                let id = prompt::text("What is your member ID?")?;
                let first_name = prompt::text("What is your first name?")?;
                let last_name = prompt::text("What is your last name?")?;
                let email = prompt::email("What is your email?")?;

                let member = Member::new(id.clone(), first_name, last_name, email);
                if report(self.directory.add_member(member))?.is_some() {
                    self.session.log_in(Role::Member(id));
                    return Ok(Screen::Libraries);
                }
                Ok(Screen::MemberLogin)
            }
            Action::Existing => {
                let id = prompt::text("What is your member ID?")?;
                if self.directory.catalog().find_member(&id) {
                    self.session.log_in(Role::Member(id));
                    Ok(Screen::Libraries)
                } else {
                    say(Tone::Warning, "No such member was found");
                    Ok(Screen::MemberLogin)
                }
            }
            Action::Back => Ok(Screen::Login),
            Action::Exit => Ok(Screen::Exit),
        }
    }

    fn libraries(&mut self) -> anyhow::Result<Screen> {
        #[derive(Clone)]
        enum Action {
            Open(String),
            Add,
            Back,
            Exit,
        }

        let is_admin = self.session.is_admin();
        let libraries = self.directory.catalog().libraries();
        if libraries.is_empty() {
            say(
                Tone::Muted,
                "Sorry, there are no libraries available yet. An admin can add them.",
            );
        }

        let mut options: Vec<_> = libraries
            .iter()
            .map(|library| (library.to_string(), Action::Open(library.id.clone())))
            .collect();
        if is_admin {
            options.push(("Add a library".to_string(), Action::Add));
        }
        let back = if is_admin { "main" } else { "member" };
        options.push((format!("Go back to the {back} menu"), Action::Back));
        options.push(("Exit program".to_string(), Action::Exit));

        match pick("Choose a library", &options)? {
            Action::Open(id) => {
                self.session.select_library(id);
                Ok(Screen::Library)
            }
            Action::Add => {
                let id = prompt::text("What is the library ID?")?;
                let name = prompt::text("What is the library name?")?;
                let library = Library::new(id.clone(), name);
                if report(self.directory.add_library(library))?.is_some() {
                    self.session.select_library(id);
                    return Ok(Screen::Library);
                }
                Ok(Screen::Libraries)
            }
            Action::Back => {
                self.session.log_out();
                Ok(if is_admin {
                    Screen::Login
                } else {
                    Screen::MemberLogin
                })
            }
            Action::Exit => Ok(Screen::Exit),
        }
    }

    /// The library currently open in the session, if it still exists.
    fn open_library(&self) -> Option<Library> {
        let id = self.session.library_id()?;
        self.directory.catalog().library(id).cloned()
    }

    fn library(&mut self) -> anyhow::Result<Screen> {
        #[derive(Clone, Copy)]
        enum Action {
            Go(Screen),
            Edit,
            Delete,
        }

        let Some(library) = self.open_library() else {
            self.session.leave_library();
            return Ok(Screen::Libraries);
        };
        say(Tone::Heading, &library);

        let mut options: Vec<_> = ItemType::ALL
            .into_iter()
            .map(|item_type| {
                let label = heading(item_type).to_string();
                (label, Action::Go(Screen::Items(item_type)))
            })
            .collect();
        if self.session.member_id().is_some() {
            options.push((
                "Current borrowings and returns".to_string(),
                Action::Go(Screen::Borrowings),
            ));
        }
        if self.session.is_admin() {
            options.push(("Edit library".to_string(), Action::Edit));
            options.push((
                "Delete library (also deletes its items; borrowings are kept)".to_string(),
                Action::Delete,
            ));
        }
        options.push(("Go back".to_string(), Action::Go(Screen::Libraries)));
        options.push(("Exit program".to_string(), Action::Go(Screen::Exit)));

        match pick("What would you like to do?", &options)? {
            Action::Go(Screen::Libraries) => {
                self.session.leave_library();
                Ok(Screen::Libraries)
            }
            Action::Go(screen) => Ok(screen),
            Action::Edit => {
                let name =
                    prompt::text_with_initial("Enter the new name of the library", &library.name)?;
                report(self.directory.edit_library(&library.id, name))?;
                Ok(Screen::Library)
            }
            Action::Delete => {
                let question = format!("Delete library {} and all of its items?", library.id);
                if !prompt::confirm(&question)? {
                    return Ok(Screen::Library);
                }
                if let Some(removed) = report(self.directory.delete_library(&library.id))? {
                    say(Tone::Muted, format!("Removed {} item(s)", removed.len()));
                    self.session.leave_library();
                    return Ok(Screen::Libraries);
                }
                Ok(Screen::Library)
            }
        }
    }

    fn items(&mut self, item_type: ItemType) -> anyhow::Result<Screen> {
        #[derive(Clone, Copy)]
        enum Action {
            Display,
            Borrow,
            Add,
            Edit,
            Delete,
            Back,
            Exit,
        }

        let Some(library) = self.open_library() else {
            self.session.leave_library();
            return Ok(Screen::Libraries);
        };
        let items: Vec<Item> = self
            .directory
            .catalog()
            .items_in(&library.id, item_type)
            .cloned()
            .collect();
        let noun = singular(item_type);

        let mut options = vec![(format!("Display {}", plural(item_type)), Action::Display)];
        if self.session.member_id().is_some() {
            options.push((format!("Borrow {noun}"), Action::Borrow));
        }
        if self.session.is_admin() {
            options.push((format!("Add {noun}"), Action::Add));
            options.push((format!("Edit {noun}"), Action::Edit));
            options.push((format!("Delete {noun}"), Action::Delete));
        }
        options.push(("Go back".to_string(), Action::Back));
        options.push(("Exit program".to_string(), Action::Exit));

        let attribute = item_type.attribute_name();
        match pick("What would you like to do?", &options)? {
            Action::Display => {
                if items.is_empty() {
                    say(Tone::Muted, "There are no items to display");
                }
                for item in &items {
                    println!("{item}");
                }
            }
            Action::Borrow => {
                if let (Some(item), Some(member_id)) = (
                    pick_item(&items, &format!("Which {noun} would you like to borrow?"))?,
                    self.session.member_id(),
                ) {
                    if let Some(id) = report(self.directory.borrow_item(&item.id, member_id))? {
                        say(Tone::Muted, format!("Borrowing ID: {id}"));
                    }
                }
            }
            Action::Add => {
                let id = prompt::text(&format!("What is the {noun} ID?"))?;
                let name = prompt::text(&format!("What is the {noun} name?"))?;
                let value = prompt::text(&format!("What is the {noun} {attribute}?"))?;
                let item = Item::new(id, library.id, name, item_type.with_attribute(value));
                report(self.directory.add_item(item))?;
            }
            Action::Edit => {
                let question = format!("Which {noun} would you like to edit?");
                if let Some(item) = pick_item(&items, &question)? {
                    let name = prompt::text_with_initial(
                        &format!("What is the {noun} name?"),
                        &item.name,
                    )?;
                    let value = prompt::text_with_initial(
                        &format!("What is the {noun} {attribute}?"),
                        item.kind.attribute(),
                    )?;
                    report(self.directory.edit_item(
                        &item.id,
                        library.id,
                        name,
                        item_type.with_attribute(value),
                    ))?;
                }
            }
            Action::Delete => {
                let question = format!("Which {noun} would you like to delete?");
                if let Some(item) = pick_item(&items, &question)? {
                    if prompt::confirm(&format!("Delete {noun} {}?", item.id))? {
                        report(self.directory.delete_item(&item.id))?;
                    }
                }
            }
            Action::Back => return Ok(Screen::Library),
            Action::Exit => return Ok(Screen::Exit),
        }
        Ok(Screen::Items(item_type))
    }

    fn borrowings(&mut self) -> anyhow::Result<Screen> {
        #[derive(Clone, Copy)]
        enum Action {
            Return,
            Back,
            Exit,
        }

        let Some(member_id) = self.session.member_id().map(str::to_string) else {
            return Ok(Screen::Library);
        };
        let catalog = self.directory.catalog();
        let pending: Vec<_> = catalog.outstanding_for(&member_id).cloned().collect();
        let completed: Vec<_> = catalog.returned_for(&member_id).cloned().collect();

        say(Tone::Heading, "Pending Borrowings");
        if pending.is_empty() {
            say(Tone::Muted, "You have no uncompleted borrowings");
        }
        for borrowing in &pending {
            println!("{borrowing}");
        }
        say(Tone::Heading, "Completed Borrowings");
        if completed.is_empty() {
            say(Tone::Muted, "You have no completed borrowings");
        }
        for borrowing in &completed {
            println!("{borrowing}");
        }
        println!();

        let mut options = Vec::new();
        if pending.is_empty() {
            say(Tone::Muted, "Currently, you have no items to return.");
        } else {
            options.push(("Return an item".to_string(), Action::Return));
        }
        options.push(("Go back".to_string(), Action::Back));
        options.push(("Exit program".to_string(), Action::Exit));

        match pick("What would you like to do?", &options)? {
            Action::Return => {
                let mut choices: Vec<_> = pending
                    .iter()
                    .map(|borrowing| (borrowing.to_string(), Some(borrowing.id)))
                    .collect();
                choices.push(("Cancel".to_string(), None));
                if let Some(id) = pick("Which borrowing would you like to return?", &choices)? {
                    report(self.directory.return_item(id))?;
                }
                Ok(Screen::Borrowings)
            }
            Action::Back => Ok(Screen::Library),
            Action::Exit => Ok(Screen::Exit),
        }
    }
}

/// Lets the user pick one of `items`, or cancel.
fn pick_item(items: &[Item], prompt: &str) -> dialoguer::Result<Option<Item>> {
    if items.is_empty() {
        say(Tone::Muted, "There are no items to choose from");
        return Ok(None);
    }

    let mut options: Vec<_> = items
        .iter()
        .map(|item| (item.to_string(), Some(item.clone())))
        .collect();
    options.push(("Cancel".to_string(), None));
    pick(prompt, &options)
}
