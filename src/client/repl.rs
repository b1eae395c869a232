//! Interactive line loop: reads commands, dispatches them through the
//! session, prints the results.

use crate::client::session::{Binding, LocalCommand, Session};
use crate::error::ClientError;
use owo_colors::OwoColorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

enum Outcome {
    Continue,
    Exit,
}

pub struct Repl {
    session: Session,
    editor: DefaultEditor,
    color: bool,
}

impl Repl {
    pub fn new(session: Session, color: bool) -> Result<Self, ClientError> {
        Ok(Self {
            session,
            editor: DefaultEditor::new()?,
            color,
        })
    }

    /// Connects before the first prompt, for invocations that name a server
    /// on the command line.
    pub fn connect(&mut self, url: &str) {
        match self.session.connect(url) {
            Ok(message) => println!("{message}"),
            Err(ClientError::Server(e)) => self.print_error(&format!("Error: {e}")),
            Err(e) => self.print_error(&format!("Failed to connect to server: {e}")),
        }
    }

    /// Runs until `exit` or end of input.
    pub fn run(&mut self) -> Result<(), ClientError> {
        loop {
            let line = match self.editor.readline(self.session.prompt()) {
                Ok(line) => line,
                Err(ReadlineError::Interrupted) => continue,
                Err(ReadlineError::Eof) => break,
                Err(e) => return Err(e.into()),
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            self.editor.add_history_entry(line)?;
            if let Outcome::Exit = self.dispatch(line) {
                break;
            }
        }
        Ok(())
    }

    fn dispatch(&mut self, line: &str) -> Outcome {
        let tokens: Vec<String> = line.split_whitespace().map(str::to_string).collect();
        let name = &tokens[0];
        let args = &tokens[1..];

        // Clone the binding so the session can be borrowed mutably below.
        let Some(binding) = self.session.binding(name).cloned() else {
            println!("Unknown command: {name}, type help to see commands");
            return Outcome::Continue;
        };

        match binding {
            Binding::Local { command, .. } => self.run_local(command, args),
            Binding::Remote {
                info,
                node_type,
                node_name,
            } => {
                match self
                    .session
                    .exec_remote(&node_type, &node_name, &info.name, args)
                {
                    Ok(output) => println!("{output}"),
                    Err(e) => self.print_error(&format!("Error: {e}")),
                }
                Outcome::Continue
            }
        }
    }

    fn run_local(&mut self, command: LocalCommand, args: &[String]) -> Outcome {
        match command {
            LocalCommand::Help => {
                if let Some(name) = args.first() {
                    match self.session.long_help(name) {
                        Some(text) => print_block(&text),
                        None => println!("Unknown command: {name}, type help to see commands"),
                    }
                } else {
                    print!("{}", self.session.help_text());
                }
                Outcome::Continue
            }
            LocalCommand::Clear => {
                print!("\x1B[2J\x1B[1;1H");
                Outcome::Continue
            }
            LocalCommand::Exit => {
                println!("Goodbye!");
                Outcome::Exit
            }
            LocalCommand::Connect => {
                match args.first() {
                    Some(url) => self.connect(url),
                    None => println!("Usage: connect <server-url>"),
                }
                Outcome::Continue
            }
            LocalCommand::Back => self.run_navigation("back", &[]),
            LocalCommand::Disconnect => self.run_navigation("disconnect", &[]),
            LocalCommand::Use => {
                if args.is_empty() {
                    println!("Usage: use <context-type>");
                    println!("Context types: emulator, ue, gnb");
                    return Outcome::Continue;
                }
                self.run_navigation("use", args)
            }
            LocalCommand::Select => {
                if args.is_empty() {
                    println!("Usage: select <node-name>");
                    return Outcome::Continue;
                }
                self.run_navigation("select", args)
            }
        }
    }

    fn run_navigation(&mut self, command: &str, args: &[String]) -> Outcome {
        match self.session.navigate(command, args) {
            Ok(message) => {
                if !message.is_empty() {
                    println!("{message}");
                }
            }
            Err(e) => self.print_error(&format!("Error: {e}")),
        }
        Outcome::Continue
    }

    fn print_error(&self, message: &str) {
        if self.color {
            println!("{}", message.red());
        } else {
            println!("{message}");
        }
    }
}

fn print_block(text: &str) {
    if text.ends_with('\n') {
        print!("{text}");
    } else {
        println!("{text}");
    }
}
