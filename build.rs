use vergen_gitcl::{Emitter, GitclBuilder};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Branch, commit and dirty flag feed `icebreaker info`.
    // vergen-gitcl 1.x: `sha(short)` / `dirty(include_untracked)` — full SHA, tracked files only.
    let gitcl = GitclBuilder::default().branch(true).sha(false).dirty(false).build()?;
    Emitter::default().add_instructions(&gitcl)?.emit()?;
    Ok(())
}
