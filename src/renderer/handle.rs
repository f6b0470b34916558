//! Generation-tagged node handles
//!
//! Renderers keep the nodes they hand out in a [`NodeArena`]. Each navigation
//! bumps the arena generation and drops every node of the previous page.

use crate::renderer::{RendererError, RendererResult};

/// Opaque reference to a node on the currently loaded page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeHandle {
    generation: u64,
    slot: usize,
}

impl NodeHandle {
    /// The page generation this handle belongs to
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Storage for the nodes of the current page generation
#[derive(Debug)]
pub(crate) struct NodeArena<T> {
    generation: u64,
    nodes: Vec<T>,
}

impl<T> NodeArena<T> {
    pub(crate) fn new() -> Self {
        Self {
            generation: 0,
            nodes: Vec::new(),
        }
    }

    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }

    pub(crate) fn register(&mut self, node: T) -> NodeHandle {
        self.nodes.push(node);
        NodeHandle {
            generation: self.generation,
            slot: self.nodes.len() - 1,
        }
    }

    pub(crate) fn resolve(&self, handle: NodeHandle) -> RendererResult<&T> {
        if handle.generation != self.generation {
            return Err(RendererError::StaleHandle {
                handle_generation: handle.generation,
                current: self.generation,
            });
        }

        self.nodes
            .get(handle.slot)
            .ok_or(RendererError::StaleHandle {
                handle_generation: handle.generation,
                current: self.generation,
            })
    }

    /// Starts a new generation; every outstanding handle becomes stale
    pub(crate) fn invalidate(&mut self) {
        self.generation += 1;
        self.nodes.clear();
    }
}

impl<T> Default for NodeArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_resolve() {
        let mut arena = NodeArena::new();
        let a = arena.register("a");
        let b = arena.register("b");

        assert_eq!(*arena.resolve(a).unwrap(), "a");
        assert_eq!(*arena.resolve(b).unwrap(), "b");
        assert_eq!(a.generation(), b.generation());
    }

    #[test]
    fn test_invalidate_makes_handles_stale() {
        let mut arena = NodeArena::new();
        let old = arena.register(1);

        arena.invalidate();
        let fresh = arena.register(2);

        assert!(matches!(
            arena.resolve(old),
            Err(RendererError::StaleHandle {
                handle_generation: 0,
                current: 1
            })
        ));
        assert_eq!(*arena.resolve(fresh).unwrap(), 2);
        assert_eq!(arena.generation(), 1);
    }

    #[test]
    fn test_same_slot_in_new_generation_is_rejected() {
        let mut arena = NodeArena::new();
        let old = arena.register("first page");
        arena.invalidate();
        arena.register("second page");

        // slot 0 exists again, but the handle is from generation 0
        assert!(arena.resolve(old).is_err());
    }
}
