//! Prompt templates for the graph pipelines.
//!
//! Every prompt instructs the model to behave as a backend data
//! processor: program input in, formatted program output out, no
//! conversational framing.

/// System prompt for the summarization stage.
pub const SUMMARY_SYSTEM: &str = "You are a backend data processor in a programmatic workflow. \
Do not converse with a nonexistent user: there is only program input and formatted program \
output. Produce concise bullet lists only.";

/// System prompt for every Cypher-producing stage.
pub const SCRIPT_SYSTEM: &str = "You are a backend data processor in a programmatic workflow. \
Do not converse with a nonexistent user: there is only program input and formatted program \
output, and no output data should be explained to a user. Return ONLY complete Cypher code \
that can be run without edit in Neo4j.";

/// Query asked of the per-request vector index when selecting context.
pub const MAIN_IDEAS_QUERY: &str = "the main ideas of this document";

/// Summarize retrieved document context into a bullet list of main ideas.
pub fn summary_prompt(context: &str) -> String {
    format!(
        "The following are excerpts from an academic document. \
Return a bullet list of the main ideas.\n\n{context}"
    )
}

/// Convert a summary into a graph-construction script.
pub fn script_prompt(summary: &str) -> String {
    format!(
        "Convert the following text into Cypher code to create a knowledge graph with \
maximum five main two-word concepts as nodes: {summary}\n\
Make sure to include the text description for each node as the \"name\" property."
    )
}

/// Merge a freshly generated graph with the existing one.
pub fn merge_prompt(fresh: &str, existing: &str) -> String {
    format!(
        "Your role is to connect some of the entities in two different knowledge graphs \
written in Cypher, with well-designed relations, into one larger graph with a coherent, \
well-named relationship schema based on judgement and source material.\n\n\
Input:\n\nGraph 1: {fresh}\n\nGraph 2: {existing}\n\nOutput:"
    )
}

/// Build a graph directly from a text concept.
pub fn concept_prompt(concept: &str) -> String {
    format!(
        "Take the following paragraph and convert it into a knowledge graph with maximum \
10 concepts. Don't limit the relations to just the main concept. Use Cypher to create it. \
Make sure to include hierarchy. Limit each bit of text to three words. Return the code to \
create the knowledge graph, using triple notation.\n\nQuestion: {concept}\n\nAnswer:"
    )
}

/// Generate a targeted update script against an existing graph.
pub fn update_prompt(graph: &str, update: &str) -> String {
    format!(
        "Take the inputted update sentence and use it to generate Cypher code that will \
alter the concepts within the following knowledge graph.\n\n\
Code that generates the knowledge graph:\n{graph}\n\n\
Assume that any updates intend to alter existing entities and relationships within the \
graph. Return only the Cypher code to update the graph, formatted so it can be immediately \
applied as a Cypher query.\n\nUpdate: {update}\n\nAnswer:"
    )
}
