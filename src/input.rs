//! Interactive terminal input: a line prompt and the named-action menu the
//! tool falls into when started without flags.

use std::io::{self, BufRead, Write};

pub struct Input {
    prompt: String,
    user_input: String,
}

impl Input {
    pub fn new(prompt: &str) -> Input {
        Input {
            prompt: prompt.to_owned(),
            user_input: String::new(),
        }
    }

    /// Prints the prompt and reads one line from stdin.
    pub fn ask_user(&mut self) -> io::Result<()> {
        println!("{}", self.prompt);
        io::stdout().flush()?;
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        self.user_input = line.trim().to_owned();
        Ok(())
    }

    /// The entry as typed.
    pub fn regular(&self) -> &str {
        &self.user_input
    }

    /// The entry as a filesystem-safe slug.
    pub fn sanitized(&self) -> String {
        slug::slugify(&self.user_input)
    }
}

/// A menu of named actions. Printing the menu and dispatching on the typed
/// name is one `ask_user` round; the caller loops.
pub struct Choice<'a> {
    actions: Vec<Action<'a>>,
}

struct Action<'a> {
    name: String,
    description: String,
    func: Box<dyn Fn() + 'a>,
}

impl<'a> Choice<'a> {
    pub fn new() -> Choice<'a> {
        Choice {
            actions: Vec::new(),
        }
    }

    pub fn add_action(&mut self, name: &str, description: &str, func: impl Fn() + 'a) {
        self.actions.push(Action {
            name: name.to_owned(),
            description: description.to_owned(),
            func: Box::new(func),
        });
    }

    pub fn ask_user(&self) {
        for action in &self.actions {
            println!("{} - {}", action.name, action.description);
        }
        let mut input = Input::new("Enter action:");
        if input.ask_user().is_err() {
            return;
        }
        if !self.dispatch(input.regular()) {
            println!("Unknown action `{}`", input.regular());
        }
    }

    fn dispatch(&self, name: &str) -> bool {
        for action in &self.actions {
            if action.name == name {
                (action.func)();
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_input_regular() {
        let mut input = Input::new("");
        input.user_input = "Hello World".to_owned();
        assert_eq!(input.regular(), "Hello World");
    }

    #[test]
    fn test_input_sanitized() {
        let mut input = Input::new("");
        input.user_input = "Hello World,42!".to_owned();
        assert_eq!(input.sanitized(), "hello-world-42");
    }

    #[test]
    fn test_choice_dispatch() {
        let ran = Cell::new(false);
        let mut choice = Choice::new();
        choice.add_action("make", "Generate website locally", || ran.set(true));

        assert!(choice.dispatch("make"));
        assert!(ran.get());
        assert!(!choice.dispatch("unknown"));
    }
}
