//! Reading a username and password from the user

use std::error::Error;
use std::io::{BufRead, Write};

/// A username/password pair.
///
/// It is only held long enough to open a session, and is never persisted anywhere.
#[derive(Clone)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new<S: ToString, T: ToString>(username: S, password: T) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    pub fn username(&self) -> &str { &self.username }
    pub fn password(&self) -> &str { &self.password }
}

/// Prompt for a username and a password on `input`.
///
/// When `mask` is set (i.e. the input is the interactive terminal), the password is read
/// without echoing it. Otherwise both fields are plain lines, so that scripted input keeps
/// working. Surrounding whitespace is trimmed from both fields. Read failures (including
/// an end of input) propagate to the caller, there is no retry here.
pub fn read_from<R: BufRead>(input: &mut R, mask: bool) -> Result<Credentials, Box<dyn Error>> {
    let username = read_plain_line(input, "username: ")?;

    let password = if mask {
        rpassword::prompt_password("password: ")?
    } else {
        read_plain_line(input, "password: ")?
    };

    Ok(Credentials::new(username.trim(), password.trim()))
}

fn read_plain_line<R: BufRead>(input: &mut R, prompt: &str) -> Result<String, Box<dyn Error>> {
    print!("{}", prompt);
    std::io::stdout().flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(format!("end of input while reading {}", prompt.trim_end_matches(": ")).into());
    }
    Ok(line)
}
