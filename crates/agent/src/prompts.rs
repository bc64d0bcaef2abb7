//! Prompt assembly: the channel-specific system instruction and the seeded
//! conversation the loop starts from.

use deskflow_core::channel::{Channel, ChannelClass};
use deskflow_core::message::{Conversation, Message};
use deskflow_core::support::{AgentInput, Speaker};

/// Appended as a user turn before the final wrap-up call when the round
/// budget is exhausted.
pub const FINAL_ROUND_INSTRUCTION: &str =
    "You have used all of your investigation budget. Give the customer your best \
     answer now using only the information gathered above. Do not request any tools.";

/// The fixed customer-facing text for a timed-out run.
pub const TIMEOUT_MESSAGE: &str =
    "I'm still looking into this for you — it's taking a bit longer than expected. \
     A member of our team will follow up with a full answer shortly.";

/// The customer-safe text attached to an unrecoverable failure.
pub const FALLBACK_ANSWER: &str =
    "I wasn't able to finish processing your request just now. Please try again in \
     a moment, or reply to this message and a member of our team will help you.";

/// The customer-facing notice attached to an approved escalation.
pub fn escalation_message(summary: &str) -> String {
    format!(
        "I'm connecting you with a member of our support team who can take this \
         further. Here's a summary of what I've checked so far so you don't have \
         to repeat yourself:\n\n{summary}"
    )
}

/// The system instruction for a channel. Tone and length rules follow the
/// channel class: chat surfaces get short conversational replies, email gets
/// a structured long-form register.
pub fn system_instruction(channel: Channel) -> String {
    let tone = match channel.class() {
        ChannelClass::Realtime => {
            "You are chatting live. Keep replies short and conversational — a few \
             sentences, no headings. The customer is waiting on screen."
        }
        ChannelClass::Async => {
            "You are replying by email. Write a complete, well-structured reply with \
             a greeting and sign-off. The customer expects thoroughness over speed."
        }
        ChannelClass::Standard => {
            "Write a clear, direct reply of moderate length. Use short paragraphs \
             and plain language."
        }
    };

    format!(
        "You are a support agent for a business phone and messaging platform. \
         Answer the customer's question using the tools available to you.\n\n\
         {tone}\n\n\
         Ground your answers in the knowledge base whenever possible: always try \
         search_knowledge_base before search_web. Use get_ticket_messages and \
         get_customer_context when the question depends on what has already \
         happened on the ticket or on the customer's account. Only call \
         escalate_to_human after you have genuinely investigated and cannot \
         resolve the issue yourself. Never invent account details or policy."
    )
}

/// Build the conversation a run starts from: system instruction, prior
/// history turns, then the customer's message seeded with ticket and
/// customer facts.
pub fn seed_conversation(input: &AgentInput) -> Conversation {
    let mut conversation = Conversation::new();
    conversation.push(Message::system(system_instruction(input.channel)));

    for turn in &input.history {
        let message = match turn.speaker {
            Speaker::Customer => Message::user(&turn.text),
            Speaker::Assistant => Message::assistant(&turn.text),
        };
        conversation.push(message);
    }

    let seeded = format!(
        "[Ticket #{} — {} | status: {} | priority: {} | customer: {} ({}) | channel: {}]\n\n{}",
        input.ticket.id,
        input.ticket.subject,
        input.ticket.status,
        input.ticket.priority,
        input.customer.name,
        input.customer.id,
        input.channel,
        input.message,
    );
    conversation.push(Message::user(seeded));
    conversation
}
