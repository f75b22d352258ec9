//! Agent and task composition for the analysis session.

use karmalens_runner::{AgentSpec, TaskSpec};

/// Role title the analyst runs under.
pub const ANALYST_ROLE: &str = "Reddit Post Analyst with Memory";

/// What the analyst optimizes for.
pub const ANALYST_GOAL: &str = "Analyze Reddit posting patterns using historical insights to \
identify what drives engagement. Suggest optimal next reddit posts based on learned patterns. \
Boil down to a single post after making all the analysis";

/// Build the analyst agent, folding prior insights into its backstory.
pub fn analyst(history_block: &str) -> AgentSpec {
    AgentSpec {
        role: ANALYST_ROLE.to_string(),
        goal: ANALYST_GOAL.to_string(),
        backstory: format!(
            "Expert at analyzing social media data and identifying patterns that lead to viral \
             content. You have access to historical analysis data that helps inform your \
             recommendations.\n\n\
             {history_block}\n\n\
             IMPORTANT: After analyzing posts, you should identify and extract:\n\
             1. Successful post characteristics (titles, timing, topics)\n\
             2. Engagement patterns (what gets upvotes vs comments)\n\
             3. Subreddit-specific trends\n\
             4. Content formats that work best\n\n\
             Use this information along with historical insights to make data-driven \
             recommendations."
        ),
    }
}

/// Build the analysis task, folding topic-relevant insights into its body.
pub fn analysis_task(username: &str, relevant_block: &str) -> TaskSpec {
    TaskSpec {
        description: format!(
            "Analyze recent Reddit posts on hot topics related to topics {username} is \
             interested in to identify engagement patterns.\n\
             Use both current data and historical insights to suggest new topics and \
             subreddits for posts.\n\n\
             {relevant_block}\n\n\
             Provide:\n\
             1. Analysis of current trending topics {username} is interested\n\
             2. Engagement pattern analysis based on upvotes, comments, and timing\n\
             3. Specific post suggestions with complete Title and Body content\n\
             4. Recommended subreddits and optimal posting times\n\
             5. Key insights that should be remembered for future analysis\n\n\
             If no post found in reddit for the user, fetch hot posts from most common \
             subreddits.\n\
             Focus on actionable recommendations based on data patterns."
        ),
        expected_output: "A comprehensive analysis with specific post recommendations, \
             including complete title and body content, plus insights to remember for future \
             use. A post made based on this analysis which can give engagement."
            .to_string(),
    }
}

/// Build a plain fetcher agent for direct post retrieval, without memory.
pub fn fetcher() -> AgentSpec {
    AgentSpec {
        role: "Reddit Data Fetcher".to_string(),
        goal: "Fetch subreddit posts and post details".to_string(),
        backstory: "You are a Reddit expert. You help users explore hot posts and detailed \
                    content from subreddits."
            .to_string(),
    }
}

/// Build the task for fetching hot posts from one subreddit.
pub fn fetch_task(subreddit: &str, count: usize) -> TaskSpec {
    TaskSpec {
        description: format!("Fetch the top {count} hot posts from r/{subreddit}"),
        expected_output: format!(
            "A numbered list of the {count} hottest posts in r/{subreddit}, with title, \
             upvotes, and comment count for each."
        ),
    }
}
