use dot_writer::{Attributes, DotWriter, Shape};

use crate::state::StateId;
use crate::tokenizer::Tokenizer;

fn node_for_state(id: StateId) -> String {
    format!("state_{}", id.index())
}

/// Render the lexical states of a tokenizer, and the transitions between them, as a Graphviz graph.
///
/// Each state is a record with its name and token count.
/// Each token that switches states is an edge from every state it is registered in,
/// labeled with the token's pattern.
pub fn render_states<S, V>(tokenizer: &Tokenizer<S, V>) -> Vec<u8> {
    let mut outbuf = Vec::new();
    {
        let mut writer = DotWriter::from(&mut outbuf);
        let mut graph = writer.digraph();

        for (idx, state) in tokenizer.states().iter().enumerate() {
            let id = StateId(idx);
            let mut node = graph.node_named(node_for_state(id));
            node.set_shape(Shape::Record);
            // Record labels treat these as structure.
            let name = state.name().replace(['{', '}', '|', '<', '>'], "_");
            node.set_label(&format!("{{{}|{} tokens}}", name, state.tokens().len()));
        }

        for (idx, state) in tokenizer.states().iter().enumerate() {
            let from = StateId(idx);
            for &token in state.tokens() {
                let Some(to) = tokenizer.transition(token) else {
                    continue;
                };
                let pattern = tokenizer
                    .token(token)
                    .pattern()
                    .replace('\\', r"\\")
                    .replace('"', r#"\""#);
                graph
                    .edge(node_for_state(from), node_for_state(to))
                    .attributes()
                    .set_label(&format!("{} {}", token, pattern));
            }
        }
    }
    outbuf
}
