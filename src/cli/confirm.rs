use std::io::{self, BufRead, IsTerminal, Write};

use dialoguer::Confirm;

/// Ask a yes/no question before anything is written. Defaults to "no".
///
/// On a terminal the question is a `dialoguer` prompt; otherwise one line is
/// read from stdin.
pub fn confirm(question: &str) -> io::Result<bool> {
    let stdin = io::stdin();
    if stdin.is_terminal() && io::stderr().is_terminal() {
        let answer = Confirm::new()
            .with_prompt(question)
            .default(false)
            .interact_opt();
        return Ok(interactive_answer(answer));
    }
    confirm_from(&mut stdin.lock(), &mut io::stderr(), question)
}

/// Escape, `q` and prompt failures all count as "no".
fn interactive_answer(answer: dialoguer::Result<Option<bool>>) -> bool {
    matches!(answer, Ok(Some(true)))
}

/// Line-based prompt for piped stdin.
///
/// Only `y` or `yes` (any case) confirms. End of input counts as "no".
pub fn confirm_from<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
    question: &str,
) -> io::Result<bool> {
    write!(writer, "{} [y/N] ", question)?;
    writer.flush()?;

    let mut answer = String::new();
    if reader.read_line(&mut answer)? == 0 {
        writeln!(writer)?;
        return Ok(false);
    }
    let answer = answer.trim();
    Ok(answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
}
