use anyhow::{Result, bail};
use std::io::{self, IsTerminal, Write};
use zeroize::Zeroizing;

pub const PIN_ENV: &str = "CREDLOCK_PIN";

/// Reads a visible credential field (name, date of birth).
///
/// Prompts on a terminal, otherwise takes the next line from stdin.
pub fn read_field(label: &str) -> Result<Zeroizing<String>> {
    if io::stdin().is_terminal() {
        eprint!("{label}: ");
        io::stderr().flush()?;
    }

    let mut buf = Zeroizing::new(String::new());
    io::stdin().read_line(&mut buf)?;
    trim_newline(&mut buf);

    if buf.is_empty() {
        bail!("no {} provided", label.to_lowercase());
    }
    Ok(buf)
}

pub fn read_pin() -> Result<Zeroizing<String>> {
    //  Environment Variable
    //  CREDLOCK_PIN=1234 credlock unlock report.locked
    if let Ok(pin) = std::env::var(PIN_ENV) {
        if !pin.is_empty() {
            return Ok(Zeroizing::new(pin));
        }
    }

    //  stdin (Pipeline)
    //  printf "1234\n" | credlock unlock report.locked --name .. --dob ..
    if !io::stdin().is_terminal() {
        let mut buf = Zeroizing::new(String::new());
        io::stdin().read_line(&mut buf)?;
        trim_newline(&mut buf);

        if !buf.is_empty() {
            return Ok(buf);
        }
    }

    //  Interactive (TTY)
    if io::stdin().is_terminal() {
        let pin = Zeroizing::new(rpassword::prompt_password("PIN: ")?);
        if !pin.is_empty() {
            return Ok(pin);
        }
    }

    bail!("No PIN provided")
}

/// Reads a PIN for locking. On a terminal the PIN is asked for twice.
pub fn read_new_pin_with_confirmation() -> Result<Zeroizing<String>> {
    if std::env::var(PIN_ENV).is_ok_and(|p| !p.is_empty()) || !io::stdin().is_terminal() {
        return read_pin();
    }

    let pin1 = Zeroizing::new(rpassword::prompt_password("New PIN: ")?);
    let pin2 = Zeroizing::new(rpassword::prompt_password("Confirm PIN: ")?);

    if pin1.is_empty() {
        bail!("PIN cannot be empty");
    }

    if pin1 != pin2 {
        bail!("PINs do not match");
    }

    Ok(pin1)
}

fn trim_newline(s: &mut String) {
    while s.ends_with('\n') || s.ends_with('\r') {
        s.pop();
    }
}
