// ABOUTME: Applies parsed commands to a tab controller and prints the result.
// ABOUTME: State is printed after a command only when tabs or tree structure changed.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::{anyhow, bail, Result};
use pw_core::{LayoutSession, Rect};
use pw_tabs::{CloseTab, SurfaceHost, TabController, TabId, TabRow};

use crate::command::Command;
use crate::host::HeadlessHost;
use crate::outline::{render_tabs, render_tree};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Driver {
    controller: TabController<HeadlessHost>,
    session_path: Option<PathBuf>,
    last_rows: Vec<TabRow>,
}

impl Driver {
    pub fn new(controller: TabController<HeadlessHost>, session_path: Option<PathBuf>) -> Self {
        Self {
            controller,
            session_path,
            last_rows: Vec::new(),
        }
    }

    pub fn controller(&self) -> &TabController<HeadlessHost> {
        &self.controller
    }

    /// Execute commands until input ends, `quit` is read or the window closes.
    /// A failing line is logged and skipped.
    pub fn run(&mut self, input: impl BufRead, out: &mut impl Write) -> Result<()> {
        for (number, line) in input.lines().enumerate() {
            let line = line?;
            let command = match Command::parse(&line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(err) => {
                    tracing::error!("Line {}: {:#}", number + 1, err);
                    continue;
                }
            };
            tracing::debug!("Line {}: {:?}", number + 1, command);

            match self.execute(command, out) {
                Ok(Flow::Quit) => break,
                Ok(Flow::Continue) => {}
                Err(err) => tracing::error!("Line {}: {:#}", number + 1, err),
            }
            if self.controller.host().window_closed() {
                writeln!(out, "(window closed)")?;
                break;
            }
        }
        Ok(())
    }

    pub fn execute(&mut self, command: Command, out: &mut impl Write) -> Result<Flow> {
        let mut force = false;
        match command {
            Command::NewTab => {
                self.controller.add_tab();
            }
            Command::Split(edge) => {
                self.controller.new_split(edge)?;
            }
            Command::ClosePane => {
                let view = self
                    .controller
                    .focused_view()
                    .ok_or_else(|| anyhow!("No pane to close"))?;
                self.controller.close_surface(view);
            }
            Command::CloseTab(position) => {
                let id = match position {
                    Some(position) => self.tab_at(position)?,
                    None => self
                        .controller
                        .selected_id()
                        .ok_or_else(|| anyhow!("No tab selected"))?,
                };
                if self.controller.close_tab(id) == CloseTab::NeedsConfirmation {
                    writeln!(out, "Tab has a running process: confirm or cancel")?;
                }
            }
            Command::Confirm => {
                if !self.controller.confirm_close() {
                    bail!("Nothing to confirm");
                }
            }
            Command::Cancel => {
                if !self.controller.cancel_close() {
                    bail!("Nothing to cancel");
                }
            }
            Command::Select(position) => {
                let id = self.tab_at(position)?;
                self.controller.select_tab(id);
            }
            Command::Goto(goto) => {
                self.controller.goto_tab(goto);
            }
            Command::Join { source, target } => {
                let source = self.tab_at(source)?;
                let target = self.tab_at(target)?;
                self.controller.join_tab(source, target)?;
            }
            Command::Unjoin { child, parent } => {
                let parent = self.tab_at(parent)?;
                let child = self
                    .controller
                    .tabs()
                    .iter()
                    .find(|tab| tab.id() == parent)
                    .and_then(|tab| child.checked_sub(1).and_then(|index| tab.children().get(index)))
                    .map(|entry| entry.id())
                    .ok_or_else(|| anyhow!("No joined tab at position {}", child))?;
                self.controller.unjoin_tab(child, parent);
            }
            Command::Focus(direction) => {
                self.controller.move_focus(direction);
            }
            Command::FocusView(view) => {
                if !self.controller.focus_surface(view) {
                    bail!("{} is not in the selected tab", view);
                }
                self.controller.host_mut().focus_surface(view);
            }
            Command::Zoom => {
                self.controller.toggle_zoom();
                force = true;
            }
            Command::Equalize => self.controller.equalize(),
            Command::Nudge(direction) => {
                let view = self
                    .controller
                    .focused_view()
                    .ok_or_else(|| anyhow!("No pane to resize"))?;
                self.controller.nudge(view, direction);
            }
            Command::Swap(a, b) => self.controller.swap_surfaces(a, b)?,
            Command::Drop { view, at } => self.controller.drop_at(view, at)?,
            Command::Tick => {
                self.controller.tick();
            }
            Command::Busy(view) => {
                let busy = self.controller.host_mut().toggle_busy(view);
                writeln!(out, "{} {}", view, if busy { "busy" } else { "idle" })?;
            }
            Command::Title(view, title) => {
                self.controller.surface_title_changed(view, &title);
            }
            Command::Bell(view) => {
                self.controller.surface_bell_changed(view, true);
            }
            Command::Show => force = true,
            Command::Save => {
                let path = self.save_session()?;
                writeln!(out, "Saved session to {}", path.display())?;
            }
            Command::Quit => return Ok(Flow::Quit),
        }
        self.publish(out, force)?;
        Ok(Flow::Continue)
    }

    /// Print the tab list and tree outline unconditionally
    pub fn show(&mut self, out: &mut impl Write) -> Result<()> {
        self.publish(out, true)
    }

    /// Write the arrangement to the session path. A closed window clears the
    /// saved session instead.
    pub fn save_session(&self) -> Result<PathBuf> {
        let path = self
            .session_path
            .clone()
            .ok_or_else(|| anyhow!("Session persistence is disabled"))?;
        if self.controller.is_window_open() {
            self.controller.snapshot().save(&path)?;
            tracing::info!("Saved session to {}", path.display());
        } else if path.exists() {
            std::fs::remove_file(&path)?;
            tracing::info!("Cleared session at {}", path.display());
        }
        Ok(path)
    }

    fn tab_at(&self, position: usize) -> Result<TabId> {
        position
            .checked_sub(1)
            .and_then(|index| self.controller.tabs().get(index))
            .map(|tab| tab.id())
            .ok_or_else(|| anyhow!("No tab at position {}", position))
    }

    fn publish(&mut self, out: &mut impl Write, force: bool) -> Result<()> {
        let rows = self.controller.tab_rows();
        let tree_changed = self.controller.take_tree_changed();
        if !force && !tree_changed && rows == self.last_rows {
            return Ok(());
        }

        let layout = &self.controller.config().layout;
        let bounds = Rect::new(0.0, 0.0, layout.window_width, layout.window_height);
        write!(out, "{}", render_tabs(&rows))?;
        write!(
            out,
            "{}",
            render_tree(self.controller.live_tree(), bounds, self.controller.focused_view())
        )?;
        writeln!(out)?;
        self.last_rows = rows;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pw_core::{Config, ViewId};
    use pw_layout::SplitTree;

    fn driver() -> Driver {
        let controller = TabController::new(SplitTree::new(), HeadlessHost::new(), Config::default());
        Driver::new(controller, None)
    }

    fn run(driver: &mut Driver, script: &str) -> String {
        let mut out = Vec::new();
        driver.run(script.as_bytes(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn join_script_builds_joined_tab() {
        let mut d = driver();
        let out = run(&mut d, "new\nselect 1\njoin 2 1\n");
        assert_eq!(d.controller().tabs().len(), 1);
        let leaves: Vec<ViewId> = d.controller().live_tree().leaves().collect();
        assert_eq!(leaves, vec![ViewId(1), ViewId(2)]);
        assert!(out.contains("> 1. Terminal (+1)"));
    }

    #[test]
    fn unjoin_takes_child_position() {
        let mut d = driver();
        run(&mut d, "new\nselect 1\njoin 2 1\nunjoin 1 1\n");
        assert_eq!(d.controller().tabs().len(), 2);
        assert!(d.controller().tabs()[0].children().is_empty());
    }

    #[test]
    fn busy_tab_waits_for_confirmation() {
        let mut d = driver();
        let out = run(&mut d, "busy 1\nclose-tab\n");
        assert!(out.contains("confirm or cancel"));
        assert!(d.controller().is_window_open());

        let out = run(&mut d, "confirm\nnew\n");
        assert!(out.contains("(window closed)"));
        assert!(!d.controller().is_window_open());
        assert!(d.controller().tabs().is_empty());
    }

    #[test]
    fn bad_lines_do_not_stop_the_script() {
        let mut d = driver();
        run(&mut d, "explode\nselect 9\nnew\n");
        assert_eq!(d.controller().tabs().len(), 2);
    }

    #[test]
    fn quit_stops_reading() {
        let mut d = driver();
        run(&mut d, "quit\nnew\n");
        assert_eq!(d.controller().tabs().len(), 1);
    }

    #[test]
    fn unchanged_state_is_not_reprinted() {
        let mut d = driver();
        let out = run(&mut d, "split right\ntick\n");
        assert_eq!(out.matches("horizontal").count(), 1);
        let out = run(&mut d, "show\n");
        assert_eq!(out.matches("horizontal").count(), 1);
    }

    #[test]
    fn save_writes_session_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layout.bin");
        let controller = TabController::new(SplitTree::new(), HeadlessHost::new(), Config::default());
        let mut d = Driver::new(controller, Some(path.clone()));

        run(&mut d, "new\nsplit down\nsave\n");
        let session = LayoutSession::load(&path).unwrap();
        assert_eq!(session.tabs.len(), 2);
        assert_eq!(session.selected, Some(1));
    }

    #[test]
    fn save_without_path_fails() {
        assert!(driver().save_session().is_err());
    }
}
