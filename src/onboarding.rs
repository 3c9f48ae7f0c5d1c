//! First-run prompts for registrar credentials and the whitelisted client IP.

use std::io::{self, BufRead, Write};

use crate::config::schema::{
    API_KEY, CLIENT, DEFAULT_API_KEY, DEFAULT_IP_ADDR, DEFAULT_USERNAME, IP_ADDR, NAMECHEAP,
    USERNAME,
};
use crate::config::{AppConfig, ConfigStore, ConfigValue};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answers {
    pub username: String,
    pub api_key: String,
    pub ip_addr: String,
}

impl Answers {
    /// Copy the answers into `store`. The caller saves.
    pub fn apply(&self, store: &mut ConfigStore) {
        store.set(NAMECHEAP, USERNAME, ConfigValue::str(&self.username));
        store.set(NAMECHEAP, API_KEY, ConfigValue::str(&self.api_key));
        store.set(CLIENT, IP_ADDR, ConfigValue::str(&self.ip_addr));
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing needed asking
    Unchanged,
    Confirmed(Answers),
    Declined,
}

/// Ask for whatever is unset or still a placeholder, then confirm.
///
/// The IP is also asked for when `public_ip` differs from the stored one.
pub fn run<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    config: &AppConfig,
    public_ip: Option<&str>,
) -> io::Result<Outcome> {
    let mut prompted = false;

    let mut username = config.credentials.username.clone();
    if needs_value(&username, DEFAULT_USERNAME) {
        prompted = true;
        username = prompt_value(
            input,
            output,
            "Please enter your namecheap username",
            &username,
            DEFAULT_USERNAME,
        )?;
    }

    let mut api_key = config.credentials.api_key.clone();
    if needs_value(&api_key, DEFAULT_API_KEY) {
        prompted = true;
        api_key = prompt_value(
            input,
            output,
            "Please enter your namecheap API key",
            &api_key,
            DEFAULT_API_KEY,
        )?;
    }

    let stored_ip = config.client_ip.as_str();
    let mut ip_addr = public_ip
        .filter(|ip| !ip.is_empty())
        .unwrap_or(stored_ip)
        .to_string();
    if needs_value(&ip_addr, DEFAULT_IP_ADDR) || ip_addr != stored_ip {
        prompted = true;
        let verb = if prefill(&ip_addr, DEFAULT_IP_ADDR).is_some() {
            "confirm"
        } else {
            "enter"
        };
        ip_addr = prompt_value(
            input,
            output,
            &format!("Please {} your IP address", verb),
            &ip_addr,
            DEFAULT_IP_ADDR,
        )?;
    }

    if !prompted {
        return Ok(Outcome::Unchanged);
    }

    let answers = Answers {
        username,
        api_key,
        ip_addr,
    };

    write!(
        output,
        "\nYou have configured:\n------------------\nUsername: {}\nAPI Key: {}\nIP Address: {}\n------------------\n\n",
        answers.username, answers.api_key, answers.ip_addr
    )?;

    loop {
        match read_answer(input, output, "Save and proceed (y/n)? ")?.as_str() {
            "y" => return Ok(Outcome::Confirmed(answers)),
            "n" => return Ok(Outcome::Declined),
            _ => continue,
        }
    }
}

fn needs_value(value: &str, placeholder: &str) -> bool {
    value.trim().is_empty() || value == placeholder
}

/// The value an empty answer keeps, if any
fn prefill<'a>(current: &'a str, placeholder: &str) -> Option<&'a str> {
    if needs_value(current, placeholder) {
        None
    } else {
        Some(current)
    }
}

fn prompt_value<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    label: &str,
    current: &str,
    placeholder: &str,
) -> io::Result<String> {
    let keep = prefill(current, placeholder);
    let prompt = match keep {
        Some(value) => format!("{} ({}): ", label, value),
        None => format!("{}: ", label),
    };

    loop {
        let entered = read_answer(input, output, &prompt)?;
        if !entered.is_empty() {
            return Ok(entered);
        }
        if let Some(value) = keep {
            return Ok(value.to_string());
        }
    }
}

fn read_answer<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
) -> io::Result<String> {
    write!(output, "{}", prompt)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "input closed while waiting for an answer",
        ));
    }
    Ok(line.trim().to_string())
}
