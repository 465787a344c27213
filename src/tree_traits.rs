/*
Element trees rendered with termtree for the `tree` command.
Labels show the open tag and, for valued leaves, the text: `<title lang="en"> Harry Potter`.
 */
use termtree::Tree;
use tracing::instrument;

use crate::domain::NodeRef;

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

impl TreeNodeConvert for NodeRef<'_> {
    #[instrument(level = "trace", skip(self))]
    fn to_tree_string(&self) -> Tree<String> {
        let tags = self.make_xml_tags();
        let label = match tags.text {
            Some(text) => format!("{} {}", tags.open, text),
            None => tags.open,
        };

        // Recursively construct the children
        let leaves: Vec<_> = self.children().map(|c| c.to_tree_string()).collect();

        Tree::new(label).with_leaves(leaves)
    }
}
