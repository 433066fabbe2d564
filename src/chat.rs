//! Simulated conversations with members. Each character keeps their own
//! history for the session; replies arrive after a short random delay.

use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::config::CHAT_REPLY_DELAY_MS;
use crate::content::Character;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Character,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub from: Sender,
    pub text: String,
    /// `HH:MM`
    pub time: String,
}

#[derive(Debug, Clone)]
struct PendingReply {
    character: u32,
    due: Instant,
    text: String,
}

#[derive(Debug, Default)]
pub struct ChatBook {
    histories: BTreeMap<u32, Vec<ChatMessage>>,
    current: Option<u32>,
    pending: Vec<PendingReply>,
}

impl ChatBook {
    /// Makes `character` the conversation partner, greeting on first contact.
    pub fn open(&mut self, character: &Character, time: &str) {
        self.current = Some(character.id);
        self.histories.entry(character.id).or_insert_with(|| {
            vec![ChatMessage {
                from: Sender::Character,
                text: format!(
                    "Bonjour ! Je suis {}. Comment puis-je vous aider ?",
                    character.name
                ),
                time: time.to_string(),
            }]
        });
    }

    pub fn current(&self) -> Option<u32> {
        self.current
    }

    pub fn history(&self, character: u32) -> &[ChatMessage] {
        self.histories.get(&character).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Appends the user's message and schedules the character's answer.
    /// Blank input is ignored; returns whether anything was sent.
    pub fn send<R: Rng + ?Sized>(
        &mut self,
        character: &Character,
        text: &str,
        now: Instant,
        time: &str,
        rng: &mut R,
    ) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }
        self.histories.entry(character.id).or_default().push(ChatMessage {
            from: Sender::User,
            text: text.to_string(),
            time: time.to_string(),
        });

        let delay = Duration::from_millis(rng.gen_range(CHAT_REPLY_DELAY_MS));
        let reply = generate_reply(character, rng);
        debug!(character = character.id, ?delay, "reply scheduled");
        self.pending.push(PendingReply {
            character: character.id,
            due: now + delay,
            text: reply,
        });
        true
    }

    /// Delivers every reply due at `now`. Returns how many arrived.
    pub fn poll(&mut self, now: Instant, time: &str) -> usize {
        let (due, waiting): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|p| p.due <= now);
        self.pending = waiting;
        let delivered = due.len();
        for reply in due {
            self.histories.entry(reply.character).or_default().push(ChatMessage {
                from: Sender::Character,
                text: reply.text,
                time: time.to_string(),
            });
        }
        delivered
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}

const EXPERT_AUTEUR: [&str; 4] = [
    "Merci pour votre message ! Je suis ravi de partager ma passion créative avec vous.",
    "C'est une excellente question ! L'animation ludique est mon domaine de prédilection.",
    "Je travaille actuellement sur plusieurs projets passionnants. Explorez EA NEXUS pour en découvrir plus !",
    "La créativité est un voyage sans fin. Chaque projet est une nouvelle aventure !",
];

const ARIA_CODEWEAVER: [&str; 4] = [
    "Techniquement parlant, c'est tout à fait réalisable avec les frameworks modernes.",
    "J'adore optimiser le code ! La performance est essentielle pour une bonne expérience utilisateur.",
    "React et JavaScript sont mes outils de prédilection pour créer des interfaces réactives.",
    "L'architecture du système est cruciale. Je veille à ce que tout soit scalable.",
];

const KAEL_STORYFORGE: [&str; 4] = [
    "Chaque histoire commence par une idée. Laissez-moi vous raconter...",
    "Les personnages sont l'âme d'une bonne narration. Je les développe avec soin.",
    "Le world building est fascinant ! Créer des univers cohérents est un art.",
    "Une intrigue captivante demande du temps et de la réflexion. La patience est clé.",
];

pub fn generate_reply<R: Rng + ?Sized>(character: &Character, rng: &mut R) -> String {
    let table: Option<&[&str]> = match character.id {
        1 => Some(&EXPERT_AUTEUR[..]),
        2 => Some(&ARIA_CODEWEAVER[..]),
        3 => Some(&KAEL_STORYFORGE[..]),
        _ => None,
    };
    if let Some(line) = table.and_then(|t| t.choose(rng)) {
        return (*line).to_string();
    }
    let title = &character.title;
    let templates = [
        format!("Intéressant ! En tant que {title}, je peux vous dire que c'est un sujet important."),
        format!("Merci de votre intérêt. Mon rôle de {title} me permet d'apporter une expertise unique."),
        "C'est une excellente question ! Laissez-moi y réfléchir...".to_string(),
        format!("Mon expérience en tant que {title} m'a appris beaucoup sur ce domaine."),
    ];
    let pick = rng.gen_range(0..templates.len());
    templates[pick].clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::tests::{loaded_repository, sample_source};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn titan() -> Character {
        loaded_repository(&sample_source()).character(7).cloned().unwrap()
    }

    #[test]
    fn opening_seeds_a_single_greeting() {
        let mut book = ChatBook::default();
        let titan = titan();
        book.open(&titan, "10:00");
        book.open(&titan, "10:05");
        let history = book.history(7);
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].text, "Bonjour ! Je suis Titan. Comment puis-je vous aider ?");
        assert_eq!(book.current(), Some(7));
    }

    #[test]
    fn blank_messages_are_ignored() {
        let mut book = ChatBook::default();
        let titan = titan();
        let mut rng = StdRng::seed_from_u64(1);
        book.open(&titan, "10:00");
        assert!(!book.send(&titan, "   ", Instant::now(), "10:01", &mut rng));
        assert_eq!(book.history(7).len(), 1);
        assert!(!book.has_pending());
    }

    #[test]
    fn reply_arrives_within_delay_window() {
        let mut book = ChatBook::default();
        let titan = titan();
        let mut rng = StdRng::seed_from_u64(9);
        let start = Instant::now();
        book.open(&titan, "10:00");
        assert!(book.send(&titan, "  Salut  ", start, "10:01", &mut rng));
        assert_eq!(book.history(7)[1].text, "Salut");
        assert_eq!(book.history(7)[1].from, Sender::User);

        assert_eq!(book.poll(start + Duration::from_millis(999), "10:01"), 0);
        assert!(book.has_pending());
        assert_eq!(book.poll(start + Duration::from_millis(3000), "10:02"), 1);
        assert!(!book.has_pending());

        let reply = &book.history(7)[2];
        assert_eq!(reply.from, Sender::Character);
        assert_eq!(reply.time, "10:02");
        assert!(!reply.text.is_empty());
    }

    #[test]
    fn unknown_characters_reply_from_title_templates() {
        let titan = titan();
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..20 {
            let reply = generate_reply(&titan, &mut rng);
            assert!(
                reply.contains("Gardien des archives")
                    || reply == "C'est une excellente question ! Laissez-moi y réfléchir..."
            );
        }
    }

    #[test]
    fn known_characters_use_their_own_lines() {
        let repo = loaded_repository(&sample_source());
        let aria = repo.character(2).unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let reply = generate_reply(aria, &mut rng);
        assert!(ARIA_CODEWEAVER.contains(&reply.as_str()));
    }
}
