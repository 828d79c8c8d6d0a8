//! Shell session
//!
//! The menu loop and one handler per menu entry.

use std::io::{BufRead, Write};

use crate::command::{Command, Outcome};
use crate::engine::Engine;
use crate::error::Result;
use crate::record::Student;

use super::Prompter;

const MENU: &str = "\
========== MENU ==========
1. Create a student
2. Read a student
3. Update a student (add a score, rename)
4. Delete a student
5. Quit
==========================";

/// Entries of the numbered menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Create,
    Read,
    Update,
    Delete,
    Quit,
}

impl MenuChoice {
    /// Map a menu number ("1" to "5") to its entry
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(Self::Create),
            "2" => Some(Self::Read),
            "3" => Some(Self::Update),
            "4" => Some(Self::Delete),
            "5" => Some(Self::Quit),
            _ => None,
        }
    }
}

/// Whether the loop keeps going after a handler
enum Flow {
    Continue,
    Exit,
}

/// Unwrap a prompt answer, ending the session when input runs out
macro_rules! answer {
    ($prompt:expr) => {
        match $prompt? {
            Some(value) => value,
            None => return Ok(Flow::Exit),
        }
    };
}

/// An interactive session over one engine
pub struct Shell<'a, R, W> {
    engine: &'a Engine,
    prompter: Prompter<R, W>,
}

impl<'a, R: BufRead, W: Write> Shell<'a, R, W> {
    pub fn new(engine: &'a Engine, input: R, output: W) -> Self {
        Self {
            engine,
            prompter: Prompter::new(input, output),
        }
    }

    /// Run the menu loop until "Quit" or end of input
    ///
    /// Engine failures are reported and the loop continues; only failures
    /// writing to the output end the session with an error.
    pub fn run(&mut self) -> Result<()> {
        loop {
            self.prompter.say(MENU)?;
            let Some(choice) = self.prompter.ask_line("Your choice: ")? else {
                break;
            };

            let flow = match MenuChoice::parse(&choice) {
                Some(MenuChoice::Create) => self.create()?,
                Some(MenuChoice::Read) => self.read()?,
                Some(MenuChoice::Update) => self.update()?,
                Some(MenuChoice::Delete) => self.delete()?,
                Some(MenuChoice::Quit) => Flow::Exit,
                None => {
                    self.prompter.say("Invalid choice. Try again.")?;
                    Flow::Continue
                }
            };

            if let Flow::Exit = flow {
                break;
            }
        }

        self.prompter.say("Goodbye!")
    }

    /// Consume the shell, returning its output sink
    pub fn into_output(self) -> W {
        self.prompter.into_output()
    }

    fn create(&mut self) -> Result<Flow> {
        let id: i64 = answer!(self.prompter.ask("Enter ID: "));
        let name = answer!(self.prompter.ask_line("Enter name: "));
        let mut student = self.engine.new_student(id, &name);

        let count: usize = answer!(self.prompter.ask("How many scores? "));
        for n in 1..=count {
            let score: f64 = answer!(self.prompter.ask(&format!("Score {}: ", n)));
            self.add_score(&mut student, score)?;
        }

        match self.engine.execute(Command::Create(student)) {
            Ok(_) => self.prompter.say("Student created.")?,
            Err(e) => self.report_failure("Creation failed", &e)?,
        }
        Ok(Flow::Continue)
    }

    fn read(&mut self) -> Result<Flow> {
        let id: i64 = answer!(self.prompter.ask("Enter the ID to read: "));

        match self.engine.execute(Command::Read { id }) {
            Ok(Outcome::Found(student)) => self.prompter.say(&student)?,
            Ok(_) => self.prompter.say("Student not found.")?,
            Err(e) => self.report_failure("Read failed", &e)?,
        }
        Ok(Flow::Continue)
    }

    /// Read-modify-write: the whole record is written back
    fn update(&mut self) -> Result<Flow> {
        let id: i64 = answer!(self.prompter.ask("Enter the ID to update: "));

        let mut student = match self.engine.execute(Command::Read { id }) {
            Ok(Outcome::Found(student)) => student,
            Ok(_) => {
                self.prompter.say("Student not found.")?;
                return Ok(Flow::Continue);
            }
            Err(e) => {
                self.report_failure("Read failed", &e)?;
                return Ok(Flow::Continue);
            }
        };

        self.prompter.say("Student found:")?;
        self.prompter.say(&student)?;

        if answer!(self.prompter.confirm("Add a score? (y/n): ")) {
            let score: f64 = answer!(self.prompter.ask("Score: "));
            self.add_score(&mut student, score)?;
        }

        if answer!(self.prompter.confirm("Change the name? (y/n): ")) {
            let name = answer!(self.prompter.ask_line("New name: "));
            student.rename(&name);
        }

        match self.engine.execute(Command::Update(student)) {
            Ok(Outcome::Updated) => self.prompter.say("Update succeeded.")?,
            Ok(_) => self.prompter.say("Update failed: student no longer exists.")?,
            Err(e) => self.report_failure("Update failed", &e)?,
        }
        Ok(Flow::Continue)
    }

    fn delete(&mut self) -> Result<Flow> {
        let id: i64 = answer!(self.prompter.ask("Enter the ID to delete: "));

        match self.engine.execute(Command::Delete { id }) {
            Ok(Outcome::Deleted) => self.prompter.say("Student deleted.")?,
            Ok(_) => self.prompter.say("Student not found.")?,
            Err(e) => self.report_failure("Delete failed", &e)?,
        }
        Ok(Flow::Continue)
    }

    fn add_score(&mut self, student: &mut Student, score: f64) -> Result<()> {
        if !student.add_score(score) {
            self.prompter.say(format!(
                "Cannot add more scores (limit reached: {}).",
                student.limits().max_scores
            ))?;
        }
        Ok(())
    }

    fn report_failure(&mut self, what: &str, error: &crate::GradebookError) -> Result<()> {
        tracing::error!(%error, "{}", what);
        self.prompter.say(format!("{}: {}", what, error))
    }
}
