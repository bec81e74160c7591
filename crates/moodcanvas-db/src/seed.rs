//! Built-in seed corpus.
//!
//! A small curated set that ships with the binary so the engine is usable
//! without a content database. It is only ever used when explicitly chosen as
//! the content store.

use uuid::Uuid;

use moodcanvas_core::ContentEntry;

struct Seed {
    id: u128,
    tags: &'static [&'static str],
    image: &'static str,
    quote: &'static str,
    author: &'static str,
    theme: [&'static str; 2],
}

const SEEDS: &[Seed] = &[
    Seed {
        id: 0x01,
        tags: &["happy", "joyful", "cheerful"],
        image: "https://picsum.photos/seed/happyday/800/1000",
        quote: "Happiness is not something ready made. It comes from your own actions.",
        author: "Dalai Lama",
        theme: ["from-amber-100", "to-orange-200"],
    },
    Seed {
        id: 0x02,
        tags: &["calm", "peaceful", "relaxed"],
        image: "https://picsum.photos/seed/calmwaters/800/1000",
        quote: "Within you, there is a stillness and a sanctuary to which you can retreat at any time.",
        author: "Hermann Hesse",
        theme: ["from-sky-100", "to-blue-200"],
    },
    Seed {
        id: 0x03,
        tags: &["inspired", "creative", "motivated"],
        image: "https://picsum.photos/seed/inspiredart/800/1000",
        quote: "The best way to predict the future is to invent it.",
        author: "Alan Kay",
        theme: ["from-purple-100", "to-indigo-200"],
    },
    Seed {
        id: 0x04,
        tags: &["curious", "wondering"],
        image: "https://picsum.photos/seed/curiousmind/800/1000",
        quote: "The important thing is not to stop questioning.",
        author: "Albert Einstein",
        theme: ["from-emerald-100", "to-teal-200"],
    },
    Seed {
        id: 0x05,
        tags: &["grateful", "thankful"],
        image: "https://picsum.photos/seed/gratefulheart/800/1000",
        quote: "Gratitude turns what we have into enough.",
        author: "Anonymous",
        theme: ["from-rose-100", "to-pink-200"],
    },
    Seed {
        id: 0x06,
        tags: &["expressive"],
        image: "https://picsum.photos/seed/defaultcanvas/800/1000",
        quote: "Every artist dips his brush in his own soul.",
        author: "Henry Ward Beecher",
        theme: ["from-gray-100", "to-slate-200"],
    },
];

/// The seed entries, with stable ids.
pub fn seed_entries() -> Vec<ContentEntry> {
    SEEDS
        .iter()
        .map(|s| {
            ContentEntry::with_id(Uuid::from_u128(s.id), s.quote, s.author, s.image)
                .tagged(s.tags.iter().copied())
                .themed(s.theme)
        })
        .collect()
}
