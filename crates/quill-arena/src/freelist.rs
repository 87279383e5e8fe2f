//! Size-ordered freelist of reclaimable spans.
//!
//! [`Freelist`] tracks spans of block memory that bump allocation has moved
//! past, typically the unused tail of a block the arena rolled over from.
//! Spans are kept in a doubly-linked list ordered largest-first; the links
//! are slot indices into a side table rather than pointers stored inside
//! the free bytes themselves.
//!
//! Lookup is worst-fit: the first span in list order that can hold the
//! request wins. Carving takes bytes from the high end of a span and shrinks
//! it in place without relinking, so a carved span keeps its position even
//! if it is now smaller than the spans behind it.

use tracing::trace;

use crate::handle::BlockId;

/// Index of a node slot in the freelist's side table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SpanId(u32);

/// A contiguous run of unallocated bytes within one block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FreeSpan {
    /// Block holding the span.
    pub block: BlockId,
    /// Offset of the first free byte within the block.
    pub offset: usize,
    /// Number of free bytes. Always non-zero while linked.
    pub size: usize,
}

impl FreeSpan {
    /// Offset one past the last free byte.
    pub fn end(&self) -> usize {
        self.offset + self.size
    }
}

/// Bytes handed out by [`Freelist::take`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Grant {
    /// The request was carved from the tail of a span that stays linked.
    Carved {
        /// Block holding the granted bytes.
        block: BlockId,
        /// Offset of the first granted byte.
        offset: usize,
    },
    /// The whole span was unlinked and handed over.
    ///
    /// Bytes past the request stay with the allocation and are not reusable.
    Whole(FreeSpan),
}

impl Grant {
    /// Block and offset of the first granted byte.
    pub fn location(&self) -> (BlockId, usize) {
        match *self {
            Self::Carved { block, offset } => (block, offset),
            Self::Whole(span) => (span.block, span.offset),
        }
    }
}

#[derive(Clone, Debug)]
struct Node {
    span: FreeSpan,
    prev: Option<SpanId>,
    next: Option<SpanId>,
}

/// Doubly-linked, largest-first list of [`FreeSpan`]s.
///
/// Node storage is a slab: unlinked slots are pushed onto `vacant` and
/// reused by the next insert, so a long-lived arena does not grow the side
/// table without bound.
#[derive(Clone, Debug, Default)]
pub struct Freelist {
    slots: Vec<Option<Node>>,
    vacant: Vec<usize>,
    head: Option<SpanId>,
    len: usize,
    bytes: usize,
}

impl Freelist {
    /// Create an empty freelist.
    pub fn new() -> Self {
        Self::default()
    }

    /// Link a span into the list, keeping it ordered largest-first.
    ///
    /// The span goes immediately before the first node that is no larger,
    /// so among equal sizes the newest span comes first. With no such node
    /// it is appended at the tail.
    ///
    /// # Panics
    ///
    /// Panics if `span.size` is zero.
    pub fn insert(&mut self, span: FreeSpan) -> SpanId {
        assert!(span.size > 0, "freelist span has size 0");

        let mut prev = None;
        let mut cursor = self.head;
        while let Some(id) = cursor {
            let node = self.node(id);
            if span.size >= node.span.size {
                break;
            }
            prev = Some(id);
            cursor = node.next;
        }

        let id = self.alloc_slot(Node {
            span,
            prev,
            next: cursor,
        });
        match prev {
            Some(p) => self.node_mut(p).next = Some(id),
            None => self.head = Some(id),
        }
        if let Some(n) = cursor {
            self.node_mut(n).prev = Some(id);
        }

        self.len += 1;
        self.bytes += span.size;
        trace!(
            block = %span.block,
            offset = span.offset,
            size = span.size,
            "span added to freelist"
        );
        id
    }

    /// Find bytes for a `size`-byte request, worst-fit.
    ///
    /// Walks head to tail and takes the first span with `size` or more bytes.
    /// If at least `min_span` bytes would remain, the request is carved from
    /// the span's tail and the span shrinks in place. Otherwise the whole
    /// span is unlinked and granted. Returns `None` when no span is big
    /// enough.
    pub fn take(&mut self, size: usize, min_span: usize) -> Option<Grant> {
        let mut cursor = self.head;
        while let Some(id) = cursor {
            let node = self.node(id);
            if node.span.size < size {
                cursor = node.next;
                continue;
            }

            let span = node.span;
            if size.saturating_add(min_span) <= span.size {
                let node = self.node_mut(id);
                node.span.size -= size;
                let offset = node.span.end();
                self.bytes -= size;
                trace!(block = %span.block, offset, size, "carved from free span");
                return Some(Grant::Carved {
                    block: span.block,
                    offset,
                });
            }

            self.unlink(id);
            trace!(
                block = %span.block,
                offset = span.offset,
                size,
                span = span.size,
                "consumed whole free span"
            );
            return Some(Grant::Whole(span));
        }
        None
    }

    /// Remove a node from the list and release its slot.
    pub fn unlink(&mut self, id: SpanId) -> FreeSpan {
        let node = self.slots[id.0 as usize]
            .take()
            .unwrap_or_else(|| panic!("freelist slot {} is vacant", id.0));
        match node.prev {
            Some(p) => self.node_mut(p).next = node.next,
            None => self.head = node.next,
        }
        if let Some(n) = node.next {
            self.node_mut(n).prev = node.prev;
        }
        self.vacant.push(id.0 as usize);
        self.len -= 1;
        self.bytes -= node.span.size;
        node.span
    }

    /// Unlink every span for which `keep` returns false.
    ///
    /// Returns the number of spans removed.
    pub fn retain(&mut self, mut keep: impl FnMut(&FreeSpan) -> bool) -> usize {
        let doomed: Vec<SpanId> = self
            .iter_ids()
            .filter(|&(_, span)| !keep(span))
            .map(|(id, _)| id)
            .collect();
        for &id in &doomed {
            self.unlink(id);
        }
        doomed.len()
    }

    /// Forget every span. Slot storage is kept for reuse.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.vacant.clear();
        self.head = None;
        self.len = 0;
        self.bytes = 0;
    }

    /// Iterate over spans head to tail.
    pub fn iter(&self) -> impl Iterator<Item = &FreeSpan> + '_ {
        self.iter_ids().map(|(_, span)| span)
    }

    /// Span sizes head to tail.
    pub fn sizes(&self) -> Vec<usize> {
        self.iter().map(|span| span.size).collect()
    }

    /// Number of linked spans.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the list holds no spans.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Total free bytes across all linked spans.
    pub fn total_bytes(&self) -> usize {
        self.bytes
    }

    /// Verify link symmetry and the cached counters.
    pub fn check_links(&self) -> Result<(), String> {
        let mut prev = None;
        let mut cursor = self.head;
        let mut count = 0usize;
        let mut bytes = 0usize;
        while let Some(id) = cursor {
            let node = self.slots[id.0 as usize]
                .as_ref()
                .ok_or_else(|| format!("linked slot {} is vacant", id.0))?;
            if node.prev != prev {
                return Err(format!("slot {} has a broken prev link", id.0));
            }
            if node.span.size == 0 {
                return Err(format!("slot {} describes an empty span", id.0));
            }
            count += 1;
            if count > self.slots.len() {
                return Err("freelist contains a cycle".into());
            }
            bytes += node.span.size;
            prev = Some(id);
            cursor = node.next;
        }
        if count != self.len || bytes != self.bytes {
            return Err(format!(
                "freelist counters drifted: {count} spans / {bytes} bytes linked, \
                 {} / {} recorded",
                self.len, self.bytes,
            ));
        }
        Ok(())
    }

    fn iter_ids(&self) -> impl Iterator<Item = (SpanId, &FreeSpan)> + '_ {
        let mut cursor = self.head;
        std::iter::from_fn(move || {
            let id = cursor?;
            let node = self.node(id);
            cursor = node.next;
            Some((id, &node.span))
        })
    }

    fn alloc_slot(&mut self, node: Node) -> SpanId {
        match self.vacant.pop() {
            Some(idx) => {
                self.slots[idx] = Some(node);
                SpanId(idx as u32)
            }
            None => {
                self.slots.push(Some(node));
                SpanId((self.slots.len() - 1) as u32)
            }
        }
    }

    fn node(&self, id: SpanId) -> &Node {
        self.slots[id.0 as usize]
            .as_ref()
            .unwrap_or_else(|| panic!("freelist slot {} is vacant", id.0))
    }

    fn node_mut(&mut self, id: SpanId) -> &mut Node {
        self.slots[id.0 as usize]
            .as_mut()
            .unwrap_or_else(|| panic!("freelist slot {} is vacant", id.0))
    }
}
