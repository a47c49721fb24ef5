//! Tree command implementation.

use netshape_app::ProjectTree;
use netshape_remote::FileRemote;
use std::path::Path;

/// Runs the tree command.
pub fn run(store: &Path, color: bool) -> Result<(), Box<dyn std::error::Error>> {
    let remote = FileRemote::open(store)?;
    let tree = ProjectTree::fetch(&remote)?;
    if tree.projects.is_empty() {
        println!("No projects in {}", store.display());
        return Ok(());
    }
    print!("{}", tree.render(color));
    Ok(())
}
