//! Story matching.
//!
//! The rule is deliberately string-based, not semantic, and is preserved
//! exactly for compatibility: a story matches when its title contains the
//! classified topic (case-insensitive), or when any classified entity is a
//! literal substring of the title (case-sensitive). First match in
//! collection order wins; there is no scoring among multiple matches.

use oracle_client::Classification;
use signaldesk_common::Story;

pub fn match_story<'a>(stories: &'a [Story], classification: &Classification) -> Option<&'a Story> {
    let topic = classification.topic.to_lowercase();
    stories.iter().find(|story| {
        story.title.to_lowercase().contains(&topic)
            || classification
                .entities
                .iter()
                .any(|entity| story.title.contains(entity.as_str()))
    })
}
