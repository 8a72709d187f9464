/// Prefix trie over surfaces, used by the decomposer.
use std::collections::HashMap;

/// A prefix tree mapping surface strings to payloads.
///
/// Several payloads may share one surface (e.g. two syllables spelled alike);
/// they are kept in insertion order.
///
/// # Example
/// ```
/// use libreading_core::trie::TrieNode;
///
/// let mut trie = TrieNode::new();
/// trie.insert("ni", 1);
/// trie.insert("hao", 2);
///
/// assert!(trie.contains_word("ni"));
/// assert!(!trie.contains_word("n"));
///
/// let input: Vec<char> = "nihao".chars().collect();
/// let prefixes = trie.walk_prefixes(&input, 0);
/// assert_eq!(prefixes.len(), 1);
/// assert_eq!(prefixes[0], (2, &[1][..]));
/// ```
#[derive(Debug)]
pub struct TrieNode<T> {
    children: HashMap<char, Box<TrieNode<T>>>,
    payload: Vec<T>,
}

impl<T> Default for TrieNode<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TrieNode<T> {
    pub fn new() -> Self {
        Self {
            children: HashMap::new(),
            payload: Vec::new(),
        }
    }

    /// Attach `value` to `surface`. Equal values are stored once.
    pub fn insert(&mut self, surface: &str, value: T)
    where
        T: PartialEq,
    {
        let mut node = self;
        for ch in surface.chars() {
            node = node.children.entry(ch).or_insert_with(|| Box::new(TrieNode::new()));
        }
        if !node.payload.contains(&value) {
            node.payload.push(value);
        }
    }

    /// Payloads stored at exactly `word`.
    pub fn get(&self, word: &str) -> &[T] {
        let mut node = self;
        for ch in word.chars() {
            match node.children.get(&ch) {
                Some(child) => node = child,
                None => return &[],
            }
        }
        &node.payload
    }

    /// Returns `true` only if `word` is a complete surface, not just a prefix.
    pub fn contains_word(&self, word: &str) -> bool {
        !self.get(word).is_empty()
    }

    /// Every surface starting at `start` in `input`, as `(end_index, payloads)`
    /// with `end_index` exclusive. Results come in order of increasing length.
    pub fn walk_prefixes(&self, input: &[char], start: usize) -> Vec<(usize, &[T])> {
        let mut res = Vec::new();
        let mut node = self;
        let mut idx = start;
        while idx < input.len() {
            match node.children.get(&input[idx]) {
                Some(child) => {
                    node = child;
                    idx += 1;
                    if !node.payload.is_empty() {
                        res.push((idx, node.payload.as_slice()));
                    }
                }
                None => break,
            }
        }
        res
    }
}
