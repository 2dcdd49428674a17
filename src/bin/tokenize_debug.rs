//! Tokenize Lisp from stdin, and print each token in its `Debug` form.
//!
//! ```ignore
//! <input.lisp tokenize_debug
//! ```

use std::io::Write;

use stacklex::{lisp, Scan};

fn main() -> Result<(), stacklex::Error> {
    #[cfg(feature = "tracing-subscriber")]
    tracing_subscriber::fmt::init();

    let mut tokenizer = lisp::tokenizer()?;
    tokenizer.push_input_named("<stdin>", std::io::stdin().lock())?;

    let mut stdout = std::io::stdout().lock();
    loop {
        match tokenizer.next_token()? {
            Scan::Token(m) => writeln!(stdout, "{:?}", m)?,
            Scan::EndOfInput(m) => {
                if tokenizer.current_state() != stacklex::DEFAULT_STATE {
                    eprintln!(
                        "warning: input ended in lexical state {:?}",
                        tokenizer.current_state()
                    );
                }
                writeln!(stdout, "{:?}", m)?;
                break;
            }
            Scan::NoInput => break,
        }
    }
    Ok(())
}
