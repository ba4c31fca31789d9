use super::node::{NodeId, Tree};
use crate::data::dataset::Dataset;
use crate::error::Result;
use log::info;

impl Tree {
    /// Bottom-up subtree raising against the records the tree was grown on.
    ///
    /// Every node below the second level is tried in place of its parent. The swap is kept
    /// only when it strictly improves accuracy on `dataset`, so accuracy never drops.
    pub fn raise_subtrees(&mut self, dataset: &Dataset) -> Result<()> {
        let old_n_nodes = self.node_count();
        let old_accuracy = self.accuracy(dataset)?;

        self.prune_node(None, None, self.root(), dataset)?;
        self.compact();

        info!(
            "pruning: n_nodes: {} -> {}, accuracy: {:.4} -> {:.4}",
            old_n_nodes,
            self.node_count(),
            old_accuracy,
            self.accuracy(dataset)?
        );
        Ok(())
    }

    fn prune_node(
        &mut self,
        grandparent: Option<NodeId>,
        parent: Option<NodeId>,
        child: NodeId,
        dataset: &Dataset,
    ) -> Result<()> {
        if let Some(parent) = parent {
            // An earlier raise may have moved the child out of its parent.
            if !self.children(parent).contains(&child) {
                return Ok(());
            }
        }

        if !self.node(child).is_leaf() {
            // Slots are re-read on every step, raises below may have rewritten them.
            for slot in 0..self.children(child).len() {
                let grandchild = self.children(child)[slot];
                self.prune_node(parent, Some(child), grandchild, dataset)?;
            }
        }

        match (grandparent, parent) {
            (Some(grandparent), Some(parent)) => {
                self.raise_subtree(grandparent, parent, child, dataset)
            }
            _ => Ok(()),
        }
    }

    /// Puts `child` in the slot of `parent` under `grandparent` and reverts unless accuracy
    /// on `dataset` strictly improves.
    fn raise_subtree(
        &mut self,
        grandparent: NodeId,
        parent: NodeId,
        child: NodeId,
        dataset: &Dataset,
    ) -> Result<()> {
        let Some(slot) = self
            .children(grandparent)
            .iter()
            .position(|&id| id == parent)
        else {
            return Ok(());
        };

        let accuracy_before = self.accuracy(dataset)?;
        self.replace_child(grandparent, slot, child);
        let accuracy_after = self.accuracy(dataset)?;
        if accuracy_after <= accuracy_before {
            self.replace_child(grandparent, slot, parent);
        }
        Ok(())
    }
}
