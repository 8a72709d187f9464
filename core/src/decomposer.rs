//! Splits text into reading entities and passthrough segments.
//!
//! The decomposer is built once per (reading, dialect). It indexes every
//! surface the reading's codec can write in a [`TrieNode`], then cuts the
//! input into chunks of surface characters and segments each chunk with a
//! small DP over positions.

use std::sync::Arc;

use ahash::AHashSet;
use tracing::trace;
use unicode_normalization::UnicodeNormalization;

use crate::dialect::DialectConfig;
use crate::entity::{Entity, LetterCase, Segment};
use crate::error::{DecompositionError, DecompositionFailure, UnsupportedError};
use crate::reading::Reading;
use crate::tone::ToneCodec;
use crate::trie::TrieNode;

/// Most decompositions [`Decomposer::decompositions`] returns.
pub const MAX_DECOMPOSITIONS: usize = 256;

/// Result of segmenting one chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ChunkParse {
    Unsegmentable,
    /// The greedy path crosses a surface written identically for two entities.
    SharedSurface,
    /// Greedy longest-first segmentation, with `(entity, from, to)` character
    /// ranges relative to the chunk.
    Segmented {
        entities: Vec<(Entity, usize, usize)>,
        unique: bool,
    },
}

/// Rules applied while walking one chunk.
#[derive(Debug, Clone, Copy)]
struct Walk {
    /// An entity ends right before the chunk, at most a separator in between.
    attached: bool,
    /// Apply the reading's boundary rule. Off when listing decompositions.
    boundaries: bool,
}

/// Surfaces starting at each position of a chunk, as `(end, entities)`.
struct Lattice<'a> {
    edges: Vec<Vec<(usize, &'a [Entity])>>,
}

impl Lattice<'_> {
    fn len(&self) -> usize {
        self.edges.len()
    }

    fn spans(&self, from: usize, to: usize) -> bool {
        self.edges[from].iter().any(|(end, _)| *end == to)
    }
}

/// Text cut into runs of reading characters.
struct Scan {
    chars: Vec<char>,
    folded: Vec<char>,
    /// `(start, end, glued)`; a glued run touches a foreign letter or digit.
    chunks: Vec<(usize, usize, bool)>,
}

pub struct Decomposer {
    reading: Arc<dyn Reading>,
    dialect: DialectConfig,
    surfaces: TrieNode<Entity>,
    alphabet: AHashSet<char>,
    /// Characters that only ever end a surface (tone digits, tone cells).
    terminators: AHashSet<char>,
    /// Punctuation that only ever starts a surface (a neutral-tone dot).
    openers: AHashSet<char>,
    vocabulary: AHashSet<String>,
    separators: Vec<String>,
}

impl std::fmt::Debug for Decomposer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Decomposer")
            .field("reading", &self.reading.name())
            .field("dialect", &self.dialect)
            .field("alphabet", &self.alphabet.len())
            .finish()
    }
}

impl Decomposer {
    pub fn new(reading: Arc<dyn Reading>, dialect: &DialectConfig) -> Result<Self, UnsupportedError> {
        dialect.ensure_reading(reading.name())?;
        let cased = reading.is_cased();
        let tones = reading.parse_tones(dialect);

        let mut surfaces = TrieNode::new();
        let mut alphabet = AHashSet::new();
        let mut finals = AHashSet::new();
        let mut inner = AHashSet::new();
        let mut firsts = AHashSet::new();
        let mut later = AHashSet::new();
        let mut vocabulary = AHashSet::new();

        for syllable in reading.syllables() {
            vocabulary.insert(syllable.clone());
            for tone in &tones {
                for surface in reading.spell(syllable, *tone, dialect) {
                    let key: Vec<char> = surface.nfc().map(|c| fold_char(c, cased)).collect();
                    let Some((last, rest)) = key.split_last() else {
                        continue;
                    };
                    finals.insert(*last);
                    inner.extend(rest.iter().copied());
                    firsts.insert(key[0]);
                    later.extend(key[1..].iter().copied());
                    alphabet.extend(key.iter().copied());
                    let key: String = key.iter().collect();
                    surfaces.insert(&key, Entity::new(syllable.clone(), *tone));
                }
            }
        }
        let terminators = finals.difference(&inner).copied().collect();
        let openers = firsts
            .difference(&later)
            .copied()
            .filter(char::is_ascii_punctuation)
            .collect();
        let separators = reading.separators(dialect);

        Ok(Self {
            reading,
            dialect: dialect.clone(),
            surfaces,
            alphabet,
            terminators,
            openers,
            vocabulary,
            separators,
        })
    }

    pub fn reading(&self) -> &Arc<dyn Reading> {
        &self.reading
    }

    pub fn dialect(&self) -> &DialectConfig {
        &self.dialect
    }

    /// Whether `syllable` is a base syllable of the reading.
    pub fn has_syllable(&self, syllable: &str) -> bool {
        self.vocabulary.contains(syllable)
    }

    /// Whether `surface` is exactly one entity as written under this dialect.
    pub fn is_reading_entity(&self, surface: &str) -> bool {
        let cased = self.reading.is_cased();
        let key: String = surface.nfc().map(|c| fold_char(c, cased)).collect();
        self.surfaces.contains_word(&key)
    }

    /// Decompose `text` into entities and passthrough runs.
    ///
    /// Adjacent passthrough text is merged into one segment. With
    /// `strictSegmentation` a chunk of reading characters that has no
    /// segmentation, or more than one, is an error; otherwise it passes
    /// through unchanged.
    pub fn decompose(&self, text: &str) -> Result<Vec<Segment>, DecompositionError> {
        let strict = self.dialect.strict_segmentation();
        let scan = self.scan(text);

        let mut segments = Vec::new();
        let mut pending = String::new();
        let mut cursor = 0;
        let mut last_entity_end = None;
        for &(start, end, glued) in &scan.chunks {
            pending.extend(&scan.chars[cursor..start]);
            cursor = end;
            let parse = if glued {
                ChunkParse::Unsegmentable
            } else {
                let walk = Walk {
                    attached: self.is_attached(&scan.chars, last_entity_end, start),
                    boundaries: true,
                };
                self.parse_chunk(&scan.folded[start..end], walk)
            };
            trace!(reading = self.reading.name(), start, end, ?parse, "chunk");
            match parse {
                ChunkParse::Segmented { entities, unique } if unique || !strict => {
                    if !pending.is_empty() {
                        segments.push(Segment::Passthrough(std::mem::take(&mut pending)));
                    }
                    for (entity, from, to) in entities {
                        let entity = self.with_case(entity, &scan.chars[start + from..start + to]);
                        segments.push(Segment::ReadingEntity(entity));
                    }
                    last_entity_end = Some(end);
                }
                parse if strict => {
                    let failure = match parse {
                        ChunkParse::Unsegmentable => DecompositionFailure::Unsegmentable,
                        _ => DecompositionFailure::Ambiguous,
                    };
                    return Err(DecompositionError {
                        reading: self.reading.name().to_owned(),
                        chunk: scan.chars[start..end].iter().collect(),
                        offset: start,
                        failure,
                    });
                }
                _ => {
                    pending.extend(&scan.chars[start..end]);
                    last_entity_end = None;
                }
            }
        }
        pending.extend(&scan.chars[cursor..]);
        if !pending.is_empty() {
            segments.push(Segment::Passthrough(pending));
        }
        Ok(segments)
    }

    /// Every way to decompose `text`, the one [`Decomposer::decompose`]
    /// prefers first.
    ///
    /// The boundary rule is not applied, so Pinyin "xian" also yields "xi" +
    /// "an". Chunks without any segmentation pass through. At most
    /// [`MAX_DECOMPOSITIONS`] results are returned.
    pub fn decompositions(&self, text: &str) -> Vec<Vec<Segment>> {
        let scan = self.scan(text);

        let mut results: Vec<Vec<Segment>> = vec![Vec::new()];
        let mut pending = String::new();
        let mut cursor = 0;
        let mut last_entity_end = None;
        for &(start, end, glued) in &scan.chunks {
            pending.extend(&scan.chars[cursor..start]);
            cursor = end;
            let paths = if glued {
                Vec::new()
            } else {
                let walk = Walk {
                    attached: self.is_attached(&scan.chars, last_entity_end, start),
                    boundaries: false,
                };
                self.chunk_paths(&scan.folded[start..end], walk)
            };
            if paths.is_empty() {
                pending.extend(&scan.chars[start..end]);
                last_entity_end = None;
                continue;
            }

            let runs: Vec<Vec<Segment>> = paths
                .into_iter()
                .map(|path| {
                    path.into_iter()
                        .map(|(entity, from, to)| {
                            Segment::ReadingEntity(self.with_case(entity, &scan.chars[start + from..start + to]))
                        })
                        .collect()
                })
                .collect();
            let mut extended = Vec::new();
            'prefixes: for prefix in &results {
                for run in &runs {
                    if extended.len() == MAX_DECOMPOSITIONS {
                        trace!(reading = self.reading.name(), "decomposition list truncated");
                        break 'prefixes;
                    }
                    let mut sequence = prefix.clone();
                    if !pending.is_empty() {
                        sequence.push(Segment::Passthrough(pending.clone()));
                    }
                    sequence.extend(run.iter().cloned());
                    extended.push(sequence);
                }
            }
            results = extended;
            pending.clear();
            last_entity_end = Some(end);
        }
        pending.extend(&scan.chars[cursor..]);
        if !pending.is_empty() {
            for sequence in &mut results {
                sequence.push(Segment::Passthrough(pending.clone()));
            }
        }
        results
    }

    /// Whether `text` decomposes into exactly `expected` (case ignored). An
    /// expected entity without tone also matches the unmarked tone.
    pub fn decomposes_to(&self, text: &str, expected: &[&Entity]) -> bool {
        let unmarked = self.reading.unmarked_tone(&self.dialect);
        match self.decompose(text) {
            Ok(segments) => {
                segments.len() == expected.len()
                    && segments.iter().zip(expected).all(|(segment, want)| match segment {
                        Segment::ReadingEntity(e) => {
                            e.same_sound(want)
                                || (want.tone().is_none() && e.syllable() == want.syllable() && e.tone() == unmarked)
                        }
                        Segment::Passthrough(_) => false,
                    })
            }
            Err(_) => false,
        }
    }

    fn scan(&self, text: &str) -> Scan {
        let cased = self.reading.is_cased();
        let chars: Vec<char> = text.nfc().collect();
        let folded: Vec<char> = chars.iter().map(|c| fold_char(*c, cased)).collect();

        let mut chunks = Vec::new();
        let mut pos = 0;
        while pos < folded.len() {
            if !self.alphabet.contains(&folded[pos]) {
                pos += 1;
                continue;
            }
            let start = pos;
            while pos < folded.len() && self.alphabet.contains(&folded[pos]) {
                if pos > start && self.openers.contains(&folded[pos]) {
                    break;
                }
                pos += 1;
                if self.terminators.contains(&folded[pos - 1]) {
                    break;
                }
            }
            // A run glued to a foreign letter or digit is not reading text.
            let glued = (start > 0 && self.is_foreign_word_char(folded[start - 1]))
                || (pos < folded.len() && self.is_foreign_word_char(folded[pos]));
            chunks.push((start, pos, glued));
        }
        Scan { chars, folded, chunks }
    }

    /// Whether the chunk at `start` directly follows an entity: nothing or a
    /// written separator in between. Whitespace detaches.
    fn is_attached(&self, chars: &[char], last_entity_end: Option<usize>, start: usize) -> bool {
        match last_entity_end {
            Some(end) if end == start => true,
            Some(end) => {
                let gap: String = chars[end..start].iter().collect();
                !gap.trim().is_empty() && self.separators.contains(&gap)
            }
            None => false,
        }
    }

    fn with_case(&self, entity: Entity, original: &[char]) -> Entity {
        let case = if self.reading.is_cased() {
            let original: String = original.iter().collect();
            LetterCase::detect(&original)
        } else {
            LetterCase::Lower
        };
        entity.with_case(case)
    }

    /// Latin letters and digits outside the alphabet.
    fn is_foreign_word_char(&self, c: char) -> bool {
        c.is_alphanumeric() && c < '\u{0250}' && !self.alphabet.contains(&c)
    }

    fn lattice(&self, chunk: &[char]) -> Lattice<'_> {
        Lattice {
            edges: (0..chunk.len()).map(|p| self.surfaces.walk_prefixes(chunk, p)).collect(),
        }
    }

    /// Entities of `payload`, written over `pos..end`, that may come next
    /// when the previous entity of the chunk started at `prev`.
    ///
    /// A suffix entity needs a predecessor, never splits what is one surface
    /// already ("er" is not "e" + "r"), and wins over a free entity written
    /// alike once something precedes.
    fn fitting<'e>(
        &self,
        lattice: &Lattice<'e>,
        payload: &'e [Entity],
        pos: usize,
        end: usize,
        prev: Option<usize>,
        walk: Walk,
    ) -> Vec<&'e Entity> {
        let follows = prev.is_some() || (pos == 0 && walk.attached);
        let mut fits: Vec<&Entity> = payload
            .iter()
            .filter(|entity| {
                if walk.boundaries && prev.is_some() && !self.reading.allows_boundary_before(entity) {
                    return false;
                }
                if self.reading.requires_predecessor(entity) {
                    return follows && !prev.is_some_and(|from| lattice.spans(from, end));
                }
                true
            })
            .collect();
        if follows && fits.iter().any(|e| self.reading.requires_predecessor(e)) {
            fits.retain(|e| self.reading.requires_predecessor(e));
        }
        fits
    }

    fn parse_chunk(&self, chunk: &[char], walk: Walk) -> ChunkParse {
        let n = chunk.len();
        let lattice = self.lattice(chunk);

        // ways[pos][prev + 1]: number of segmentations of chunk[pos..], capped
        // at 2, when the previous entity started at `prev` (0: none).
        let mut ways = vec![vec![0u8; n + 1]; n + 1];
        ways[n].fill(1);
        for pos in (0..n).rev() {
            for slot in 0..=pos {
                let prev = slot.checked_sub(1);
                let mut count = 0u8;
                for (end, payload) in &lattice.edges[pos] {
                    let fits = self.fitting(&lattice, payload, pos, *end, prev, walk).len().min(2) as u8;
                    count = count.saturating_add(fits.saturating_mul(ways[*end][pos + 1])).min(2);
                }
                ways[pos][slot] = count;
            }
        }
        let total = ways[0][0];
        if total == 0 {
            return ChunkParse::Unsegmentable;
        }

        let mut entities = Vec::new();
        let mut pos = 0;
        let mut prev = None;
        while pos < n {
            let mut chosen = None;
            for (end, payload) in lattice.edges[pos].iter().rev() {
                if ways[*end][pos + 1] == 0 {
                    continue;
                }
                match self.fitting(&lattice, payload, pos, *end, prev, walk).as_slice() {
                    [] => continue,
                    [entity] => {
                        chosen = Some(((*entity).clone(), *end));
                        break;
                    }
                    _ => return ChunkParse::SharedSurface,
                }
            }
            let Some((entity, end)) = chosen else {
                return ChunkParse::Unsegmentable;
            };
            entities.push((entity, pos, end));
            prev = Some(pos);
            pos = end;
        }
        ChunkParse::Segmented {
            entities,
            unique: total == 1,
        }
    }

    /// Every segmentation of `chunk`, longest first surfaces first.
    fn chunk_paths(&self, chunk: &[char], walk: Walk) -> Vec<Vec<(Entity, usize, usize)>> {
        let lattice = self.lattice(chunk);
        let mut search = PathSearch {
            decomposer: self,
            lattice: &lattice,
            walk,
            current: Vec::new(),
            found: Vec::new(),
        };
        search.extend(0, None);
        search.found
    }
}

/// Depth-first walk over a chunk lattice collecting complete paths.
struct PathSearch<'d, 'e> {
    decomposer: &'d Decomposer,
    lattice: &'d Lattice<'e>,
    walk: Walk,
    current: Vec<(Entity, usize, usize)>,
    found: Vec<Vec<(Entity, usize, usize)>>,
}

impl PathSearch<'_, '_> {
    fn extend(&mut self, pos: usize, prev: Option<usize>) {
        if self.found.len() >= MAX_DECOMPOSITIONS {
            return;
        }
        if pos == self.lattice.len() {
            self.found.push(self.current.clone());
            return;
        }
        let (decomposer, lattice) = (self.decomposer, self.lattice);
        for (end, payload) in lattice.edges[pos].iter().rev() {
            let fits = decomposer.fitting(lattice, payload, pos, *end, prev, self.walk);
            for entity in fits {
                self.current.push((entity.clone(), pos, *end));
                self.extend(*end, Some(pos));
                self.current.pop();
            }
        }
    }
}

/// Lowercases a single character when the reading is cased and the mapping is
/// one-to-one, so character offsets stay aligned with the input.
fn fold_char(c: char, cased: bool) -> char {
    if !cased {
        return c;
    }
    let mut lower = c.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(l), None) => l,
        _ => c,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::{OptionSchema, STRICT_SEGMENTATION};
    use crate::entity::Tone;
    use crate::reading::Reading;
    use crate::tone::ToneCodec;

    const TONES: [Tone; 2] = [Tone::new("1"), Tone::new("2")];

    /// Toy reading: numbered tones, vowel-initial syllables may not follow
    /// another syllable, "r" only follows one.
    struct Toy {
        syllables: Vec<String>,
        schema: OptionSchema,
    }

    impl Toy {
        fn new(syllables: &[&str]) -> Arc<dyn Reading> {
            Arc::new(Self {
                syllables: syllables.iter().map(|s| (*s).to_owned()).collect(),
                schema: OptionSchema::new().with_common(&TONES),
            })
        }
    }

    impl ToneCodec for Toy {
        fn tones(&self) -> &[Tone] {
            &TONES
        }

        fn unmarked_tone(&self, _dialect: &DialectConfig) -> Option<Tone> {
            None
        }

        fn spell(&self, syllable: &str, tone: Option<Tone>, _dialect: &DialectConfig) -> Vec<String> {
            match tone {
                Some(t) => vec![format!("{syllable}{t}")],
                None => vec![syllable.to_owned()],
            }
        }
    }

    impl Reading for Toy {
        fn name(&self) -> &str {
            "Toy"
        }

        fn syllables(&self) -> &[String] {
            &self.syllables
        }

        fn option_schema(&self) -> &OptionSchema {
            &self.schema
        }

        fn is_cased(&self) -> bool {
            true
        }

        fn allows_boundary_before(&self, next: &Entity) -> bool {
            !next.syllable().starts_with(['a', 'e', 'o'])
        }

        fn requires_predecessor(&self, entity: &Entity) -> bool {
            entity.syllable() == "r"
        }

        fn separators(&self, _dialect: &DialectConfig) -> Vec<String> {
            vec!["'".to_owned()]
        }
    }

    fn decomposer(reading: &Arc<dyn Reading>, strict: bool) -> Decomposer {
        let dialect = DialectConfig::new(reading.name(), reading.option_schema(), [(STRICT_SEGMENTATION, strict)])
            .unwrap();
        Decomposer::new(reading.clone(), &dialect).unwrap()
    }

    fn entity(syllable: &str, tone: Option<&'static str>) -> Segment {
        Segment::ReadingEntity(Entity::new(syllable, tone.map(Tone::new)))
    }

    #[test]
    fn tone_digit_closes_chunk() {
        let toy = Toy::new(&["ha", "ham", "ma"]);
        let d = decomposer(&toy, true);
        assert_eq!(
            d.decompose("ham2ha1").unwrap(),
            vec![entity("ham", Some("2")), entity("ha", Some("1"))]
        );
    }

    #[test]
    fn strict_rejects_ambiguous_chunk() {
        let toy = Toy::new(&["ha", "ham", "m"]);
        let err = decomposer(&toy, true).decompose("x ham2").unwrap_err();
        assert_eq!(err.failure, DecompositionFailure::Ambiguous);
        assert_eq!(err.offset, 2);
        assert_eq!(err.chunk, "ham2");
    }

    #[test]
    fn lenient_takes_longest_first() {
        let toy = Toy::new(&["ha", "ham", "m"]);
        let segments = decomposer(&toy, false).decompose("ham2").unwrap();
        assert_eq!(segments, vec![entity("ham", Some("2"))]);
    }

    #[test]
    fn boundary_rule_blocks_vowel_initial_syllable() {
        let toy = Toy::new(&["xi", "xian", "an"]);
        let d = decomposer(&toy, true);
        assert_eq!(d.decompose("xian").unwrap(), vec![entity("xian", None)]);
        assert_eq!(
            d.decompose("xi'an").unwrap(),
            vec![entity("xi", None), Segment::passthrough("'"), entity("an", None)]
        );
    }

    #[test]
    fn suffix_needs_a_predecessor() {
        let toy = Toy::new(&["ha", "e", "er", "r"]);
        let d = decomposer(&toy, true);
        assert_eq!(d.decompose("har").unwrap(), vec![entity("ha", None), entity("r", None)]);
        assert_eq!(d.decompose("ha1r").unwrap(), vec![entity("ha", Some("1")), entity("r", None)]);
        assert_eq!(d.decompose("ha'r").unwrap().len(), 3);
        assert!(d.decompose("r").is_err());
        assert!(d.decompose("ha r").is_err());
    }

    #[test]
    fn suffix_never_splits_a_syllable() {
        let toy = Toy::new(&["ha", "e", "er", "r"]);
        let d = decomposer(&toy, true);
        assert_eq!(d.decompose("er").unwrap(), vec![entity("er", None)]);
        assert_eq!(d.decompositions("er"), vec![vec![entity("er", None)]]);
    }

    #[test]
    fn decompositions_ignore_the_boundary_rule() {
        let toy = Toy::new(&["xi", "xian", "an"]);
        let d = decomposer(&toy, false);
        assert_eq!(
            d.decompositions("xian"),
            vec![
                vec![entity("xian", None)],
                vec![entity("xi", None), entity("an", None)],
            ]
        );
        let both = d.decompositions("xian, xian");
        assert_eq!(both.len(), 4);
        assert_eq!(both[0][1], Segment::passthrough(", "));
        assert_eq!(d.decompositions("hello"), vec![vec![Segment::passthrough("hello")]]);
    }

    #[test]
    fn unknown_chunks_pass_through() {
        let toy = Toy::new(&["ha"]);
        let segments = decomposer(&toy, false).decompose("ha1 hello!").unwrap();
        assert_eq!(segments, vec![entity("ha", Some("1")), Segment::passthrough(" hello!")]);

        let err = decomposer(&toy, true).decompose("ha1 hello!").unwrap_err();
        assert_eq!(err.failure, DecompositionFailure::Unsegmentable);
    }

    #[test]
    fn run_glued_to_foreign_digit_is_kept_whole() {
        let toy = Toy::new(&["ha", "xi"]);
        let d = decomposer(&toy, false);
        assert_eq!(d.decompose("ha7xi").unwrap(), vec![Segment::passthrough("ha7xi")]);
        assert_eq!(d.decompose("ha xi").unwrap().len(), 3);
        assert!(decomposer(&toy, true).decompose("ha7").is_err());
    }

    #[test]
    fn case_is_recorded_per_entity() {
        let toy = Toy::new(&["ha", "xi"]);
        let segments = decomposer(&toy, false).decompose("HaXI").unwrap();
        assert_eq!(segments[0].entity().unwrap().case(), LetterCase::Title);
        assert_eq!(segments[1].entity().unwrap().case(), LetterCase::Upper);
        assert_eq!(segments[1].entity().unwrap().syllable(), "xi");
    }

    #[test]
    fn reading_entity_check() {
        let toy = Toy::new(&["ha"]);
        let d = decomposer(&toy, false);
        assert!(d.is_reading_entity("ha2"));
        assert!(d.is_reading_entity("Ha"));
        assert!(!d.is_reading_entity("ha2ha"));
        assert!(d.has_syllable("ha"));
    }

    #[test]
    fn dialect_of_another_reading_is_rejected() {
        let toy = Toy::new(&["ha"]);
        let other = DialectConfig::defaults("Other", toy.option_schema());
        assert!(matches!(
            Decomposer::new(toy, &other),
            Err(UnsupportedError::DialectMismatch { .. })
        ));
    }
}
