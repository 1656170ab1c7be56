use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Public entry point; unauthenticated visitors land here
pub const PUBLIC_ROOT: &str = "/";

/// Routes the console knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Route {
    Root,
    Customers,
    Cars,
    Models,
    Administrators,
    Rentals,
}

impl Route {
    pub const PROTECTED: [Route; 5] = [
        Route::Customers,
        Route::Cars,
        Route::Models,
        Route::Administrators,
        Route::Rentals,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Root => PUBLIC_ROOT,
            Route::Customers => "/users",
            Route::Cars => "/cars",
            Route::Models => "/models",
            Route::Administrators => "/administrators",
            Route::Rentals => "/rentals",
        }
    }

    pub fn is_protected(&self) -> bool {
        !matches!(self, Route::Root)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}

impl FromStr for Route {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_start_matches('/').to_ascii_lowercase().as_str() {
            "" | "root" | "login" => Ok(Route::Root),
            "users" | "customers" => Ok(Route::Customers),
            "cars" => Ok(Route::Cars),
            "models" => Ok(Route::Models),
            "administrators" | "admins" => Ok(Route::Administrators),
            "rentals" => Ok(Route::Rentals),
            other => Err(format!("unknown route '{}'", other)),
        }
    }
}

/// Navigation side of the console; the gate only ever replaces
pub trait Navigator {
    fn current(&self) -> &str;

    fn push(&mut self, path: &str);

    /// Swap the current entry so "back" cannot return to it
    fn replace(&mut self, path: &str);
}

/// Linear route history with browser-like push/replace/back
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteHistory {
    entries: Vec<String>,
}

impl RouteHistory {
    pub fn new() -> Self {
        Self {
            entries: vec![PUBLIC_ROOT.to_string()],
        }
    }

    pub fn starting_at(path: &str) -> Self {
        Self {
            entries: vec![path.to_string()],
        }
    }

    /// Pop the current entry; false when there is nothing to go back to
    pub fn back(&mut self) -> bool {
        if self.entries.len() > 1 {
            self.entries.pop();
            true
        } else {
            false
        }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }
}

impl Default for RouteHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator for RouteHistory {
    fn current(&self) -> &str {
        self.entries.last().map(String::as_str).unwrap_or(PUBLIC_ROOT)
    }

    fn push(&mut self, path: &str) {
        self.entries.push(path.to_string());
    }

    fn replace(&mut self, path: &str) {
        match self.entries.last_mut() {
            Some(last) => *last = path.to_string(),
            None => self.entries.push(path.to_string()),
        }
    }
}
