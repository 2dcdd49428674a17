//! Render the lexical states of the Lisp token set as Graphviz.
//!
//! Usage:
//!
//! ```ignore
//! states_to_graphviz | dot -T png >output.png
//! ```

use std::io::Write;

fn main() -> Result<(), stacklex::Error> {
    let tokenizer = stacklex::lisp::tokenizer()?;
    let graphviz = stacklex::render_states(&tokenizer);
    std::io::stdout().lock().write_all(&graphviz)?;
    Ok(())
}
