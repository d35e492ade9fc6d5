//! Prompt text for the realtime model session.

/// System instructions installed when the model session starts.
pub const INSTRUCTIONS: &str = "\
You are the voice assistant of a service office. You answer customer \
questions, look up and manage their contact record, and schedule \
meetings on their behalf. Be brief and speak naturally. Before handling \
account-specific requests, make sure a contact record is selected.";

/// Assistant greeting appended when a session starts.
pub const WELCOME_MESSAGE: &str = "\
Welcome to our service desk. Could you share the phone number on your \
contact record so I can look you up? If you are new here, just say so \
and I will create a record for you.";

/// Builds the system prompt steering the model toward contact lookup.
///
/// Used when no contact is selected and the knowledge base had no
/// answer for the utterance.
#[must_use]
pub fn lookup_contact_prompt(utterance: &str) -> String {
    format!(
        "The user said: \"{utterance}\". No contact record is selected \
         yet. If the user provided a phone number, look up their contact \
         record with it. If they want to register, collect their phone \
         number, full name, email and company name, then create the \
         record. Otherwise, ask for their phone number."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_prompt_embeds_utterance() {
        let prompt = lookup_contact_prompt("my number is 0521234567");
        assert!(prompt.contains("0521234567"));
        assert!(prompt.contains("phone number"));
    }
}
