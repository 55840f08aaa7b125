//! A transport that draws the dashboard in the terminal.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chatdash_core::Result;
use chatdash_core::event::InteractionEvent;
use chatdash_core::render::{ButtonStyle, DashboardView, Embed, FormPayload, TextStyle};
use chatdash_core::transport::Transport;
use colored::Colorize;

/// What the REPL needs to know about the dashboard to build events.
#[derive(Debug, Default, Clone)]
pub struct ConsoleState {
    /// Category whose page is currently shown
    pub category: Option<String>,
    /// The most recently opened edit form
    pub form: Option<FormPayload>,
    pub closed: bool,
}

/// Prints every view to stdout and records the state the REPL reads.
#[derive(Debug, Clone, Default)]
pub struct ConsoleTransport {
    state: Arc<Mutex<ConsoleState>>,
}

impl ConsoleTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> Arc<Mutex<ConsoleState>> {
        Arc::clone(&self.state)
    }

    fn with_state(&self, f: impl FnOnce(&mut ConsoleState)) {
        if let Ok(mut state) = self.state.lock() {
            f(&mut state);
        }
    }

    fn show(&self, view: &DashboardView) {
        print_embed(&view.embed);

        if let Some(controls) = view.controls() {
            let buttons: Vec<String> = controls
                .buttons
                .iter()
                .map(|b| {
                    let label = match &b.emoji {
                        Some(emoji) => format!("[{} {}]", emoji, b.label),
                        None => format!("[{}]", b.label),
                    };
                    match b.style {
                        ButtonStyle::Success => label.green().to_string(),
                        ButtonStyle::Danger => label.red().to_string(),
                    }
                })
                .collect();
            println!("  {}", buttons.join(" "));
        }
        if let Some(menu) = view.selector() {
            println!("  {}", menu.placeholder.bright_black());
            for option in &menu.options {
                let emoji = option.emoji.as_deref().unwrap_or(" ");
                println!(
                    "    {} {} {}",
                    emoji,
                    option.label.bright_cyan(),
                    format!("- {}", option.description).bright_black()
                );
            }
        }
        println!();

        let category = view
            .controls()
            .and_then(|c| c.buttons.first())
            .map(|b| b.id.category.clone());
        self.with_state(|state| state.category = category);
    }
}

fn print_embed(embed: &Embed) {
    let bar = "│".truecolor(
        ((embed.color >> 16) & 0xFF) as u8,
        ((embed.color >> 8) & 0xFF) as u8,
        (embed.color & 0xFF) as u8,
    );
    println!("{} {}", bar, embed.title.bold());
    for line in embed.description.lines() {
        println!("{} {}", bar, line);
    }
    for field in &embed.fields {
        println!("{}", bar);
        println!("{} {}", bar, field.name.bright_white().bold());
        for line in field.value.lines() {
            println!("{}   {}", bar, line);
        }
    }
}

#[async_trait]
impl Transport for ConsoleTransport {
    async fn publish(&self, view: &DashboardView) -> Result<()> {
        self.show(view);
        Ok(())
    }

    async fn update(&self, view: &DashboardView) -> Result<()> {
        self.show(view);
        Ok(())
    }

    async fn acknowledge(&self, _event: &InteractionEvent) -> Result<()> {
        Ok(())
    }

    async fn open_form(&self, _trigger: &InteractionEvent, form: &FormPayload) -> Result<()> {
        println!("{}", format!("Edit {}", form.title).bright_magenta().bold());
        for field in &form.fields {
            let kind = match field.style {
                TextStyle::Short => "line",
                TextStyle::Paragraph => "text",
            };
            let required = if field.required { " (required)" } else { "" };
            println!(
                "  {} {}{}  {}",
                field.label.bright_white(),
                format!("[{kind}]").bright_black(),
                required.yellow(),
                field.placeholder.bright_black()
            );
        }
        println!(
            "{}",
            "Use: submit <Setting>=<value>; ...   or: dismiss".bright_black()
        );
        println!();

        let form = form.clone();
        self.with_state(|state| state.form = Some(form));
        Ok(())
    }

    async fn close(&self, view: &DashboardView) -> Result<()> {
        print_embed(&view.embed);
        println!();
        println!("{}", "Press Enter to exit.".bright_black());
        self.with_state(|state| {
            state.closed = true;
            state.form = None;
        });
        Ok(())
    }
}
