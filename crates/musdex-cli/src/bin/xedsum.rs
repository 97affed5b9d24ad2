//! xedsum: rebuild archives from their version-controlled trees
//!
//! Without a command, combines every managed archive.

use musdex_cli::DefaultCommand;

fn main() {
    musdex_cli::main(DefaultCommand::Combine);
}
