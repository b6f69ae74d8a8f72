// ABOUTME: Parses driver script lines into commands.
// ABOUTME: One command per line; blank lines and `#` comments are skipped.

use anyhow::{anyhow, bail, Context, Result};
use pw_core::{Point, ViewId};
use pw_layout::{FocusDirection, NewDirection, SpatialDirection};
use pw_tabs::GotoTab;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    NewTab,
    Split(NewDirection),
    ClosePane,
    /// 1-based tab position; None closes the selected tab
    CloseTab(Option<usize>),
    Confirm,
    Cancel,
    Select(usize),
    Goto(GotoTab),
    Join { source: usize, target: usize },
    /// `child` is a 1-based position among `parent`'s joined tabs
    Unjoin { child: usize, parent: usize },
    Focus(FocusDirection),
    FocusView(ViewId),
    Zoom,
    Equalize,
    Nudge(SpatialDirection),
    Swap(ViewId, ViewId),
    Drop { view: ViewId, at: Point },
    Tick,
    Busy(ViewId),
    Title(ViewId, String),
    Bell(ViewId),
    Show,
    Save,
    Quit,
}

impl Command {
    /// Parse one line. Returns None for blank lines and comments.
    pub fn parse(line: &str) -> Result<Option<Command>> {
        // `#` opening the line or standing alone starts a comment; `#42` in an argument stays
        let mut words = line
            .split_whitespace()
            .enumerate()
            .take_while(|(index, word)| *word != "#" && !(*index == 0 && word.starts_with('#')))
            .map(|(_, word)| word);
        let Some(name) = words.next() else {
            return Ok(None);
        };
        let args: Vec<&str> = words.collect();

        let command = match (name, args.as_slice()) {
            ("new", []) => Command::NewTab,
            ("split", [edge]) => Command::Split(parse_edge(edge)?),
            ("close-pane", []) => Command::ClosePane,
            ("close-tab", []) => Command::CloseTab(None),
            ("close-tab", [n]) => Command::CloseTab(Some(parse_position(n)?)),
            ("confirm", []) => Command::Confirm,
            ("cancel", []) => Command::Cancel,
            ("select", [n]) => Command::Select(parse_position(n)?),
            ("goto", [target]) => Command::Goto(parse_goto(target)?),
            ("join", [source, target]) => Command::Join {
                source: parse_position(source)?,
                target: parse_position(target)?,
            },
            ("unjoin", [child, parent]) => Command::Unjoin {
                child: parse_position(child)?,
                parent: parse_position(parent)?,
            },
            ("focus", [target]) => match parse_focus(target) {
                Some(direction) => Command::Focus(direction),
                None => Command::FocusView(parse_view(target)?),
            },
            ("zoom", []) => Command::Zoom,
            ("equalize", []) => Command::Equalize,
            ("nudge", [direction]) => Command::Nudge(parse_spatial(direction)?),
            ("swap", [a, b]) => Command::Swap(parse_view(a)?, parse_view(b)?),
            ("drop", [view, x, y]) => Command::Drop {
                view: parse_view(view)?,
                at: Point::new(parse_coord(x)?, parse_coord(y)?),
            },
            ("tick", []) => Command::Tick,
            ("busy", [view]) => Command::Busy(parse_view(view)?),
            ("title", [view, rest @ ..]) if !rest.is_empty() => {
                Command::Title(parse_view(view)?, rest.join(" "))
            }
            ("bell", [view]) => Command::Bell(parse_view(view)?),
            ("show", []) => Command::Show,
            ("save", []) => Command::Save,
            ("quit", []) => Command::Quit,
            _ => bail!("Unrecognized command: {}", line.trim()),
        };
        Ok(Some(command))
    }
}

fn parse_position(text: &str) -> Result<usize> {
    let position: usize = text
        .parse()
        .with_context(|| format!("Invalid tab position '{}'", text))?;
    if position == 0 {
        bail!("Tab positions start at 1");
    }
    Ok(position)
}

/// Accepts `v3` or `3`
fn parse_view(text: &str) -> Result<ViewId> {
    let digits = text.strip_prefix('v').unwrap_or(text);
    digits
        .parse()
        .map(ViewId)
        .with_context(|| format!("Invalid view '{}'", text))
}

fn parse_coord(text: &str) -> Result<f32> {
    text.parse()
        .with_context(|| format!("Invalid coordinate '{}'", text))
}

fn parse_spatial(text: &str) -> Result<SpatialDirection> {
    match text {
        "left" => Ok(SpatialDirection::Left),
        "right" => Ok(SpatialDirection::Right),
        "up" => Ok(SpatialDirection::Up),
        "down" => Ok(SpatialDirection::Down),
        _ => Err(anyhow!("Invalid direction '{}'", text)),
    }
}

fn parse_edge(text: &str) -> Result<NewDirection> {
    match text {
        "left" => Ok(NewDirection::Left),
        "right" => Ok(NewDirection::Right),
        "up" => Ok(NewDirection::Up),
        "down" => Ok(NewDirection::Down),
        _ => Err(anyhow!("Invalid split edge '{}'", text)),
    }
}

fn parse_focus(text: &str) -> Option<FocusDirection> {
    match text {
        "prev" => Some(FocusDirection::Previous),
        "next" => Some(FocusDirection::Next),
        other => parse_spatial(other).ok().map(FocusDirection::Spatial),
    }
}

fn parse_goto(text: &str) -> Result<GotoTab> {
    match text {
        "prev" => Ok(GotoTab::Previous),
        "next" => Ok(GotoTab::Next),
        "last" => Ok(GotoTab::Last),
        n => n
            .parse()
            .map(GotoTab::Index)
            .with_context(|| format!("Invalid goto target '{}'", n)),
    }
}
