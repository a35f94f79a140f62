use crate::runtime::command::Command;
use crate::runtime::effect::Effect;
use crate::runtime::event::AppEvent;
use crate::runtime::key_bindings::KeyBindings;
use crate::runtime::reducer::Reducer;
use crate::state::{Combobox, Selection};
use crate::terminal::{Terminal, TerminalEvent};
use crate::ui::layout::WidgetLayout;
use crate::ui::renderer::{Renderer, RendererConfig};
use std::io;
use std::time::{Duration, Instant};
use tracing::{debug, info};

const IDLE_POLL: Duration = Duration::from_millis(120);

/// Drives a mounted combobox against a real terminal until the user selects
/// something or exits.
pub struct Runtime {
    state: Combobox,
    terminal: Terminal,
    key_bindings: KeyBindings,
    renderer: Renderer,
    layout: WidgetLayout,
    selection: Option<Selection>,
    should_exit: bool,
}

impl Runtime {
    pub fn new(state: Combobox, terminal: Terminal) -> Self {
        Self::with_parts(state, terminal, KeyBindings::new(), Renderer::default())
    }

    pub fn with_key_bindings(
        state: Combobox,
        terminal: Terminal,
        key_bindings: KeyBindings,
    ) -> Self {
        Self::with_parts(state, terminal, key_bindings, Renderer::default())
    }

    pub fn with_renderer_config(mut self, config: RendererConfig) -> Self {
        self.renderer = Renderer::new(config);
        self
    }

    fn with_parts(
        state: Combobox,
        terminal: Terminal,
        key_bindings: KeyBindings,
        renderer: Renderer,
    ) -> Self {
        Self {
            state,
            terminal,
            key_bindings,
            renderer,
            layout: WidgetLayout::default(),
            selection: None,
            should_exit: false,
        }
    }

    pub fn run(&mut self) -> io::Result<()> {
        self.terminal.enter()?;

        let run_result = (|| -> io::Result<()> {
            self.render()?;

            while !self.should_exit {
                self.process_command(Command::Tick)?;
                if self.should_exit {
                    break;
                }

                let timeout = self.state.poll_timeout(Instant::now(), IDLE_POLL);
                let event = self.terminal.poll_event(timeout)?;
                self.dispatch_app_event(AppEvent::Terminal(event))?;
            }

            Ok(())
        })();

        let exit_result = self.terminal.exit();
        run_result.and(exit_result)
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    /// Unmounts the widget and hands back whatever was selected.
    pub fn finish(self) -> Option<Selection> {
        self.state.unmount();
        self.selection
    }

    fn dispatch_app_event(&mut self, event: AppEvent) -> io::Result<()> {
        match event {
            AppEvent::Terminal(TerminalEvent::Resize(size)) => {
                self.terminal.set_size(size);
                self.render()
            }
            AppEvent::Terminal(TerminalEvent::Key(key)) => {
                let command = self.key_bindings.command_for(key);
                self.process_command(command)
            }
            AppEvent::Terminal(TerminalEvent::Pointer(pointer)) => {
                let target = self.layout.hit_test(pointer.col, pointer.row);
                debug!(col = pointer.col, row = pointer.row, ?target, "pointer press");
                self.process_command(Command::Pointer(target))
            }
            AppEvent::Terminal(TerminalEvent::Tick) => self.process_command(Command::Tick),
            AppEvent::Command(command) => self.process_command(command),
        }
    }

    fn process_command(&mut self, command: Command) -> io::Result<()> {
        let effects = Reducer::reduce(&mut self.state, command, Instant::now());
        self.apply_effects(effects)
    }

    fn apply_effects(&mut self, effects: Vec<Effect>) -> io::Result<()> {
        let mut render_requested = false;

        for effect in effects {
            match effect {
                Effect::RequestRender => {
                    render_requested = true;
                }
                Effect::Select(selection) => {
                    info!(?selection, "selection made");
                    self.selection = Some(selection);
                    self.should_exit = true;
                }
                Effect::Exit => {
                    debug!("exit requested");
                    self.should_exit = true;
                }
            }
        }

        if render_requested && !self.should_exit {
            self.render()?;
        }

        Ok(())
    }

    fn render(&mut self) -> io::Result<()> {
        let frame = self
            .renderer
            .render(&self.state.view(), self.terminal.size());
        self.terminal.render_frame(&frame)?;
        self.layout = frame.layout;
        Ok(())
    }
}
