use chrono::NaiveDate;

pub const DEFAULT_PERSONA: &str = "You are the friendly front-desk assistant of a tuition centre. \
Answer questions about classes, fees and policies using the knowledge base information provided. \
If the information does not cover a question, say so and suggest contacting the centre instead of guessing. \
Keep replies short, warm and easy to read.\n\n\
You can check open lesson slots and book them for students. Before booking, confirm the date, time, \
subject and teacher with the student and ask for the student's name and a phone number or email address. \
Only use addSlot or createBatchSchedule when the user gives an admin password; never guess, repeat or reveal passwords. \
If a tool reports an error, explain the problem in plain words.";

/// System message for one request: persona, today's date, retrieved context.
pub fn build_system_prompt(persona: &str, context: &str, today: NaiveDate) -> String {
    let mut prompt = String::from(persona.trim());

    prompt.push_str(&format!(
        "\n\nToday's date is {} ({}). Convert relative dates such as \"tomorrow\" or \"next Monday\" \
into YYYY-MM-DD before calling any tool.",
        today.format("%A, %B %d, %Y"),
        today.format("%Y-%m-%d"),
    ));

    let context = context.trim();
    if context.is_empty() {
        prompt.push_str("\n\nNo knowledge base entries matched this question.");
    } else {
        prompt.push_str("\n\nKnowledge base information:\n");
        prompt.push_str(context);
    }

    prompt
}
