//! Static question bank.
//!
//! A versioned catalog of pre-authored, validated statements per trait.
//! This is the deterministic fallback when the adaptive generator cannot
//! produce a usable set; sampling here cannot fail as long as the catalog
//! covers the per-trait quota.

use once_cell::sync::Lazy;
use rand::seq::SliceRandom;
use rand::Rng;

use super::{Direction, Question, QuestionSet, QuestionSource, TraitKind};

/// Catalog revision, bumped when statements are added or reworded.
pub const BANK_VERSION: u32 = 3;

/// One pre-authored statement.
#[derive(Debug, Clone, Copy)]
struct BankEntry {
    text: &'static str,
    trait_kind: TraitKind,
    direction: Direction,
}

const fn entry(text: &'static str, trait_kind: TraitKind, direction: Direction) -> BankEntry {
    BankEntry {
        text,
        trait_kind,
        direction,
    }
}

static CATALOG: Lazy<Vec<BankEntry>> = Lazy::new(|| {
    use Direction::{Negative, Positive};
    use TraitKind::*;

    vec![
        // Openness
        entry("I enjoy exploring ideas that have no immediate practical use.", Openness, Positive),
        entry("I often seek out art, music, or writing that is new to me.", Openness, Positive),
        entry("I like to question the way things have always been done.", Openness, Positive),
        entry("I am quick to imagine alternatives to the obvious approach.", Openness, Positive),
        entry("I enjoy conversations about abstract or philosophical topics.", Openness, Positive),
        entry("I look forward to trying unfamiliar food, places, or routines.", Openness, Positive),
        entry("I prefer to stick with methods I already know work.", Openness, Negative),
        entry("I find abstract discussions a waste of time.", Openness, Negative),
        entry("I rarely daydream or play with hypothetical scenarios.", Openness, Negative),
        entry("I am uncomfortable when plans change at the last minute.", Openness, Negative),
        entry("I enjoy learning skills outside my area of expertise.", Openness, Positive),
        // Conscientiousness
        entry("I finish what I start, even when it stops being fun.", Conscientiousness, Positive),
        entry("I keep my commitments, even small ones.", Conscientiousness, Positive),
        entry("I plan my day before it begins.", Conscientiousness, Positive),
        entry("I double-check my work before calling it done.", Conscientiousness, Positive),
        entry("I keep my workspace and files organized.", Conscientiousness, Positive),
        entry("I set goals and track my progress toward them.", Conscientiousness, Positive),
        entry("I often leave tasks unfinished.", Conscientiousness, Negative),
        entry("I tend to put things off until the last possible moment.", Conscientiousness, Negative),
        entry("I frequently misplace things I need.", Conscientiousness, Negative),
        entry("I make decisions on impulse rather than by planning.", Conscientiousness, Negative),
        entry("I am reliable about deadlines.", Conscientiousness, Positive),
        // Extraversion
        entry("I feel energized after spending time with a group of people.", Extraversion, Positive),
        entry("I start conversations with people I do not know.", Extraversion, Positive),
        entry("I like being the one who gets things moving in a group.", Extraversion, Positive),
        entry("I talk through my ideas out loud with others.", Extraversion, Positive),
        entry("I seek out busy, lively environments.", Extraversion, Positive),
        entry("I am usually the one who suggests getting people together.", Extraversion, Positive),
        entry("I prefer to work alone rather than on a team.", Extraversion, Negative),
        entry("Long social events leave me drained.", Extraversion, Negative),
        entry("I keep my thoughts to myself in group discussions.", Extraversion, Negative),
        entry("I avoid being the center of attention.", Extraversion, Negative),
        entry("I find it easy to make new acquaintances.", Extraversion, Positive),
        // Agreeableness
        entry("I go out of my way to make others feel at ease.", Agreeableness, Positive),
        entry("I assume people mean well unless proven otherwise.", Agreeableness, Positive),
        entry("I am quick to forgive.", Agreeableness, Positive),
        entry("I enjoy helping colleagues even when there is nothing in it for me.", Agreeableness, Positive),
        entry("I look for compromises that leave everyone satisfied.", Agreeableness, Positive),
        entry("I take time to listen to people's problems.", Agreeableness, Positive),
        entry("I push my point until the other person gives in.", Agreeableness, Negative),
        entry("I am skeptical of other people's motives.", Agreeableness, Negative),
        entry("I find it hard to sympathize with complaints.", Agreeableness, Negative),
        entry("Winning matters more to me than keeping the peace.", Agreeableness, Negative),
        entry("People describe me as considerate.", Agreeableness, Positive),
        // Neuroticism
        entry("I worry about things that might go wrong.", Neuroticism, Positive),
        entry("Small setbacks can spoil my whole day.", Neuroticism, Positive),
        entry("I often feel tense under deadline pressure.", Neuroticism, Positive),
        entry("My mood can shift quickly without an obvious cause.", Neuroticism, Positive),
        entry("I replay stressful conversations in my head afterwards.", Neuroticism, Positive),
        entry("I get irritated more easily than most people.", Neuroticism, Positive),
        entry("I stay calm when things go badly.", Neuroticism, Negative),
        entry("I rarely feel anxious before important events.", Neuroticism, Negative),
        entry("I recover quickly from disappointments.", Neuroticism, Negative),
        entry("I seldom feel overwhelmed by my responsibilities.", Neuroticism, Negative),
        entry("Criticism tends to stay with me longer than it should.", Neuroticism, Positive),
    ]
});

/// Splits a requested total across the five traits as evenly as possible,
/// remainder distributed to the earliest traits in canonical order.
pub fn trait_quotas(total: usize) -> [(TraitKind, usize); TraitKind::COUNT] {
    let base = total / TraitKind::COUNT;
    let remainder = total % TraitKind::COUNT;
    let mut quotas = [(TraitKind::Openness, 0); TraitKind::COUNT];
    for (i, &t) in TraitKind::ALL.iter().enumerate() {
        quotas[i] = (t, base + usize::from(i < remainder));
    }
    quotas
}

/// The static statement catalog.
pub struct QuestionBank;

impl QuestionBank {
    /// Number of catalog statements for a trait.
    pub fn trait_pool_size(trait_kind: TraitKind) -> usize {
        CATALOG.iter().filter(|e| e.trait_kind == trait_kind).count()
    }

    /// Largest total that keeps every trait's quota within its catalog pool.
    fn max_satisfiable_total(requested: usize) -> usize {
        let mut total = requested;
        while total > 0 {
            let fits = trait_quotas(total)
                .iter()
                .all(|&(t, quota)| quota <= Self::trait_pool_size(t));
            if fits {
                return total;
            }
            total -= 1;
        }
        0
    }
}

/// Samples a balanced question set from the bank.
///
/// Selects each trait's quota uniformly at random without replacement, tags
/// everything `source=bank`, and shuffles the combined set so trait order is
/// not predictable to the respondent. If the catalog cannot cover a trait's
/// quota the total is reduced until every quota fits; a trait is never
/// partially filled below its quota.
pub fn sample_balanced<R: Rng + ?Sized>(total: usize, rng: &mut R) -> QuestionSet {
    let total = QuestionBank::max_satisfiable_total(total);
    let mut questions: Vec<Question> = Vec::with_capacity(total);

    for (trait_kind, quota) in trait_quotas(total) {
        let pool: Vec<&BankEntry> = CATALOG
            .iter()
            .filter(|e| e.trait_kind == trait_kind)
            .collect();
        for picked in pool.choose_multiple(rng, quota) {
            questions.push(Question {
                text: picked.text.to_string(),
                trait_kind: picked.trait_kind,
                direction: picked.direction,
                source: QuestionSource::Bank,
            });
        }
    }

    questions.shuffle(rng);
    QuestionSet::new(questions)
}
