use async_trait::async_trait;
use std::io::Write;
use std::str::FromStr;
use tracing::debug;

use crate::api::ApiClient;
use crate::cli::input::LineSource;
use crate::cli::utils::notification_line;
use crate::cli::Console;
use crate::error::ClientError;
use crate::grid::{render_grid, FetchOutcome, PageSize, SortDirection};
use crate::resources::{Administrator, Car, Customer, Model, Notification, Rental, Resource, Screen};
use crate::session::{GateDecision, Navigator, Route};

const HELP: &str = "\
Commands:
  next | prev               move one page
  page N                    jump to page N (from 1)
  size N                    rows per page: 10, 25, 50, 100
  filter [TEXT]             server-side filter; empty clears it
  sort COLUMN [asc|desc]    order the rows on this page
  hide COLUMN | show COLUMN toggle a column
  details ID                show one record
  delete ID                 delete, or cancel a rental
  refresh                   reload the current page
  goto ROUTE | back         switch screens
  logout | quit";

/// One line of input in the interactive browser
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseCommand {
    Next,
    Previous,
    /// 1-based, as typed
    Page(usize),
    Size(PageSize),
    Filter(String),
    Sort(String, SortDirection),
    Hide(String),
    Show(String),
    Details(String),
    Delete(String),
    Refresh,
    Goto(Route),
    Back,
    Logout,
    Help,
    Quit,
}

impl FromStr for BrowseCommand {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };
        let required = |what: &str| -> Result<String, String> {
            if rest.is_empty() {
                Err(format!("'{}' needs {}", word, what))
            } else {
                Ok(rest.to_string())
            }
        };

        match word.to_ascii_lowercase().as_str() {
            "next" | "n" => Ok(BrowseCommand::Next),
            "prev" | "previous" | "p" => Ok(BrowseCommand::Previous),
            "page" => match required("a page number")?.parse::<usize>() {
                Ok(n) if n >= 1 => Ok(BrowseCommand::Page(n)),
                _ => Err(format!("'{}' is not a page number", rest)),
            },
            "size" => {
                let n = required("a page size")?
                    .parse::<usize>()
                    .map_err(|_| format!("'{}' is not a page size", rest))?;
                PageSize::try_from(n)
                    .map(BrowseCommand::Size)
                    .map_err(|e| e.to_string())
            }
            "filter" | "f" => Ok(BrowseCommand::Filter(rest.to_string())),
            "sort" => {
                let arg = required("a column")?;
                let mut parts = arg.split_whitespace();
                let column = parts.next().unwrap_or_default().to_string();
                let direction = match parts.next().map(str::to_ascii_lowercase).as_deref() {
                    None | Some("asc") => SortDirection::Ascending,
                    Some("desc") => SortDirection::Descending,
                    Some(other) => return Err(format!("unknown sort direction '{}'", other)),
                };
                Ok(BrowseCommand::Sort(column, direction))
            }
            "hide" => Ok(BrowseCommand::Hide(required("a column")?)),
            "show" => Ok(BrowseCommand::Show(required("a column")?)),
            "details" => Ok(BrowseCommand::Details(required("a record id")?)),
            "delete" | "cancel" => Ok(BrowseCommand::Delete(required("a record id")?)),
            "refresh" | "r" => Ok(BrowseCommand::Refresh),
            "goto" | "go" => required("a route")?.parse::<Route>().map(BrowseCommand::Goto),
            "back" => Ok(BrowseCommand::Back),
            "logout" => Ok(BrowseCommand::Logout),
            "help" | "?" => Ok(BrowseCommand::Help),
            "quit" | "exit" | "q" => Ok(BrowseCommand::Quit),
            other => Err(format!("unknown command '{}'; type 'help'", other)),
        }
    }
}

/// A mounted resource screen, whatever its row type
#[async_trait]
pub trait ScreenView: Send {
    async fn mount(&mut self) -> FetchOutcome;

    /// Apply a grid command; `Ok(None)` when it did nothing (e.g. next on the last page)
    async fn apply(&mut self, command: &BrowseCommand) -> Result<Option<FetchOutcome>, ClientError>;

    async fn delete(&mut self, id: &str) -> Notification;

    async fn details(&self, id: &str) -> Result<String, ClientError>;

    fn render(&self) -> String;

    fn last_error(&self) -> Option<String>;
}

#[async_trait]
impl<R: Resource> ScreenView for Screen<R> {
    async fn mount(&mut self) -> FetchOutcome {
        Screen::mount(self).await
    }

    async fn apply(&mut self, command: &BrowseCommand) -> Result<Option<FetchOutcome>, ClientError> {
        let grid = self.grid_mut();
        let outcome = match command {
            BrowseCommand::Next => grid.next_page().await,
            BrowseCommand::Previous => grid.previous_page().await,
            BrowseCommand::Page(n) => Some(grid.set_page_index(n - 1).await?),
            BrowseCommand::Size(size) => Some(grid.set_page_size(*size).await),
            BrowseCommand::Filter(text) => Some(grid.set_filter_text(text.clone()).await),
            BrowseCommand::Refresh => Some(grid.refresh().await),
            BrowseCommand::Sort(column, direction) => {
                grid.sort_current_page(column, *direction)?;
                None
            }
            BrowseCommand::Hide(column) => {
                grid.set_column_visible(column, false)?;
                None
            }
            BrowseCommand::Show(column) => {
                grid.set_column_visible(column, true)?;
                None
            }
            _ => None,
        };
        Ok(outcome)
    }

    async fn delete(&mut self, id: &str) -> Notification {
        Screen::delete(self, id).await
    }

    async fn details(&self, id: &str) -> Result<String, ClientError> {
        let record = Screen::details(self, id).await?;
        Ok(R::columns()
            .iter()
            .map(|c| format!("{:<16} {}", format!("{}:", c.label), c.cell(&record)))
            .collect::<Vec<_>>()
            .join("\n"))
    }

    fn render(&self) -> String {
        render_grid(self.grid())
    }

    fn last_error(&self) -> Option<String> {
        self.grid().state().last_error().map(str::to_string)
    }
}

pub fn open_screen(route: Route, client: ApiClient, page_size: PageSize) -> Option<Box<dyn ScreenView>> {
    let screen: Box<dyn ScreenView> = match route {
        Route::Root => return None,
        Route::Customers => Box::new(Screen::<Customer>::new(client, page_size)),
        Route::Cars => Box::new(Screen::<Car>::new(client, page_size)),
        Route::Models => Box::new(Screen::<Model>::new(client, page_size)),
        Route::Administrators => Box::new(Screen::<Administrator>::new(client, page_size)),
        Route::Rentals => Box::new(Screen::<Rental>::new(client, page_size)),
    };
    Some(screen)
}

/// Read-eval-render loop over one screen at a time.
///
/// The session gate runs before every cycle, so a logout or a credential
/// cleared elsewhere ends the loop at the public root.
pub async fn run_browse<L, W>(console: &mut Console, start: Route, mut input: L, out: &mut W) -> anyhow::Result<()>
where
    L: LineSource,
    W: Write,
{
    if !start.is_protected() {
        anyhow::bail!("'{}' is the sign-in page; use 'rental-admin auth login'", start);
    }

    let mut route = start;
    console.navigator.push(route.path());
    let mut screen: Option<Box<dyn ScreenView>> = None;

    loop {
        if let GateDecision::Deny = console.recheck()? {
            writeln!(out, "Not signed in. Run 'rental-admin auth login <username>' first.")?;
            return Ok(());
        }

        if screen.is_none() {
            let Some(mut view) = open_screen(route, console.client.clone(), console.page_size) else {
                anyhow::bail!("nothing to browse at {}", route);
            };
            if view.mount().await == FetchOutcome::Failed {
                writeln!(out, "✗ {}", view.last_error().unwrap_or_default())?;
            }
            screen = Some(view);
        }
        let Some(view) = screen.as_mut() else {
            continue;
        };

        writeln!(out, "{}", view.render())?;
        let prompt = format!("{}> ", route);
        if !input.draws_prompt() {
            write!(out, "{}", prompt)?;
        }
        out.flush()?;

        let Some(line) = input.read_line(&prompt).await? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<BrowseCommand>() {
            Ok(command) => command,
            Err(message) => {
                writeln!(out, "{}", message)?;
                continue;
            }
        };
        debug!("Browse command {:?} on {}", command, route);

        match command {
            BrowseCommand::Quit => break,
            BrowseCommand::Help => writeln!(out, "{}", HELP)?,
            BrowseCommand::Logout => {
                console.client.session().logout(&mut console.navigator)?;
                writeln!(out, "✓ Signed out")?;
            }
            BrowseCommand::Goto(target) => {
                if !target.is_protected() {
                    writeln!(out, "'{}' is the sign-in page; use 'logout' to leave", target)?;
                    continue;
                }
                console.navigator.push(target.path());
                route = target;
                screen = None;
            }
            BrowseCommand::Back => {
                if !console.navigator.back() {
                    writeln!(out, "No earlier screen")?;
                    continue;
                }
                match console.navigator.current().parse::<Route>().ok().filter(Route::is_protected) {
                    Some(target) => {
                        route = target;
                        screen = None;
                    }
                    None => {
                        // never step back onto the public root
                        console.navigator.push(route.path());
                        writeln!(out, "No earlier screen")?;
                    }
                }
            }
            BrowseCommand::Delete(id) => {
                let notification = view.delete(&id).await;
                writeln!(out, "{}", notification_line(&notification))?;
            }
            BrowseCommand::Details(id) => match view.details(&id).await {
                Ok(text) => writeln!(out, "{}", text)?,
                Err(e) => writeln!(out, "✗ {}", e)?,
            },
            other => match view.apply(&other).await {
                Ok(Some(FetchOutcome::Failed)) => {
                    writeln!(out, "✗ {}", view.last_error().unwrap_or_default())?;
                }
                Ok(Some(_)) => {}
                Ok(None) if matches!(other, BrowseCommand::Next) => writeln!(out, "Already on the last page")?,
                Ok(None) if matches!(other, BrowseCommand::Previous) => writeln!(out, "Already on the first page")?,
                Ok(None) => {}
                Err(e) => writeln!(out, "✗ {}", e)?,
            },
        }
    }

    Ok(())
}
