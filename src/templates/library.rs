//! Template text for every context
//!
//! Placeholders: `{word}` target word, `{verb}` generic verb phrase,
//! `{incorrect}` confusable stand-in.

use super::{AnchorScenes, ContextTemplates};

pub(super) static WORK: ContextTemplates = ContextTemplates {
    choice: &[
        "In a project kickoff, a colleague uses the word with the meaning you just read. Which word was it: {word} or {incorrect}?",
        "Your manager asks you to {verb} and sums it up in one word with that meaning. Is it {word} or {incorrect}?",
    ],
    scenario: &[
        "You are presenting quarterly results to leadership. Use \"{word}\" to explain what changed this quarter.",
        "A colleague is stuck on a client proposal. Suggest how they could {verb}, using \"{word}\" in your advice.",
        "Write the opening line of a team update email that naturally includes \"{word}\".",
    ],
    completion: &[
        "Finish this line from a project update so it uses {word}: \"The main thing I took from this sprint was ...\"",
        "Finish this note to your manager so it uses {word}: \"Before the deadline, we should ...\"",
    ],
    application: &[
        "Draft a short message to a stakeholder who disagrees with your plan. Use \"{word}\" to reframe the discussion.",
        "Describe a past decision at work where \"{word}\" would have changed the outcome, and explain how.",
    ],
    scenes: AnchorScenes {
        visual_metaphor: "Picture a whiteboard where \"{word}\" is drawn as the arrow connecting every box.",
        story_fragment: "The meeting was going nowhere until someone said \"{word}\" and the room leaned in.",
        sensory_scene: "Feel the hum of a busy office settle into focus the moment \"{word}\" becomes the plan.",
        power_moment: "You stand up, say \"{word}\", and the whole project turns toward you.",
    },
    reflection: "When did you last see \"{word}\" at work without having a name for it?",
};

pub(super) static ACADEMIC: ContextTemplates = ContextTemplates {
    choice: &[
        "In a seminar, a speaker uses the word defined above. Which term did they use: {word} or {incorrect}?",
        "A reviewer asks you to {verb} and names the concept with that definition. Is it {word} or {incorrect}?",
    ],
    scenario: &[
        "You are writing the abstract of a paper. Use \"{word}\" to state your main contribution.",
        "A classmate asks you to {verb} while revising an essay. Explain your suggestion using \"{word}\".",
        "Summarize a lecture you remember in two sentences, one of which uses \"{word}\".",
    ],
    completion: &[
        "Finish this sentence from an essay so it uses {word}: \"The author's argument depends on ...\"",
        "Finish this seminar remark so it uses {word}: \"What the evidence really shows is ...\"",
    ],
    application: &[
        "Write a thesis statement for an essay in which \"{word}\" is the central concept.",
        "Critique a theory you know well, using \"{word}\" to name its weakest point.",
    ],
    scenes: AnchorScenes {
        visual_metaphor: "Imagine a library stack where every book spine reads \"{word}\".",
        story_fragment: "Late at night, the research finally clicked when the footnote said \"{word}\".",
        sensory_scene: "Smell old paper and hear pages turning as \"{word}\" appears in the margin.",
        power_moment: "You defend your argument, use \"{word}\" exactly right, and the panel nods.",
    },
    reflection: "Which idea you studied would have been clearer if you had known \"{word}\"?",
};

pub(super) static CREATIVE: ContextTemplates = ContextTemplates {
    choice: &[
        "A poet wants a word with exactly the meaning you just read. Which one do they choose: {word} or {incorrect}?",
        "Your character must {verb} and describes it with the word defined above. Is it {word} or {incorrect}?",
    ],
    scenario: &[
        "Write the first line of a short story in which \"{word}\" is the hidden theme.",
        "Describe a painting you love using \"{word}\" to capture its feeling.",
        "Your protagonist has to {verb}. Narrate that moment using \"{word}\".",
    ],
    completion: &[
        "Finish this line of a story so it uses {word}: \"By the time the music stopped, ...\"",
        "Finish this description of a scene so it uses {word}: \"Nobody else noticed that her smile ...\"",
    ],
    application: &[
        "Write a four-line poem whose turn depends on the word \"{word}\".",
        "Pitch a film scene in two sentences where \"{word}\" is the emotional core.",
    ],
    scenes: AnchorScenes {
        visual_metaphor: "See \"{word}\" as a single brushstroke that changes the whole canvas.",
        story_fragment: "In the last chapter, the hero whispered \"{word}\" and the story finally made sense.",
        sensory_scene: "Hear a cello hold one low note while \"{word}\" settles over the room like dusk.",
        power_moment: "You read your work aloud, land on \"{word}\", and the audience goes silent.",
    },
    reflection: "What would you create today if \"{word}\" were its title?",
};

pub(super) static SOCIAL: ContextTemplates = ContextTemplates {
    choice: &[
        "At dinner, a friend uses the word with the meaning you just read. Which word was it: {word} or {incorrect}?",
        "A friend asks you to {verb} and you answer with the word defined above. Is it {word} or {incorrect}?",
    ],
    scenario: &[
        "A friend shares difficult news. Respond in two sentences that naturally include \"{word}\".",
        "You are introducing two people at a party. Use \"{word}\" to explain why they should meet.",
        "Text a family member about your week using \"{word}\".",
    ],
    completion: &[
        "Finish this message to a friend so it uses {word}: \"Last night's dinner reminded me that ...\"",
        "Finish what you say during a disagreement so it uses {word}: \"I hear you, and still ...\"",
    ],
    application: &[
        "Recall a recent disagreement and rewrite what you said so it uses \"{word}\".",
        "Write a toast for a friend's celebration built around \"{word}\".",
    ],
    scenes: AnchorScenes {
        visual_metaphor: "Picture \"{word}\" as the bridge two strangers cross to meet in the middle.",
        story_fragment: "At the reunion, an old friend said \"{word}\" and years of distance disappeared.",
        sensory_scene: "Feel warm laughter around a crowded table the moment \"{word}\" fits the night.",
        power_moment: "You choose \"{word}\" at exactly the right moment and the tension breaks.",
    },
    reflection: "Who in your life shows \"{word}\" most clearly?",
};

pub(super) static TECHNICAL: ContextTemplates = ContextTemplates {
    choice: &[
        "In a design review, someone uses the term with the meaning you just read. Which term was it: {word} or {incorrect}?",
        "The on-call engineer must {verb} and names the issue with the word defined above. Is it {word} or {incorrect}?",
    ],
    scenario: &[
        "Explain a system you work with to a new teammate, using \"{word}\" in your explanation.",
        "Write a commit message for a fix where \"{word}\" describes the root cause.",
        "You need to {verb} before a release. Describe your plan using \"{word}\".",
    ],
    completion: &[
        "Finish this line from a postmortem so it uses {word}: \"The service slowed down because ...\"",
        "Finish this sentence from a design doc so it uses {word}: \"Each component is built so that ...\"",
    ],
    application: &[
        "Write a short incident summary in which \"{word}\" explains what went wrong.",
        "Propose an architecture change and justify it with \"{word}\".",
    ],
    scenes: AnchorScenes {
        visual_metaphor: "See \"{word}\" as a blueprint line that every other part snaps onto.",
        story_fragment: "At 3 a.m. the logs finally showed it: \"{word}\" was the reason all along.",
        sensory_scene: "Hear the servers hum steadily once \"{word}\" is understood and fixed.",
        power_moment: "You name the bug as \"{word}\", ship the fix, and the dashboards turn green.",
    },
    reflection: "Where in the systems you use does \"{word}\" already show up?",
};

pub(super) static GENERAL: ContextTemplates = ContextTemplates {
    choice: &[
        "Which word carries the meaning you just read: {word} or {incorrect}?",
        "Someone needs to {verb} and describes it with the word defined above. Is it {word} or {incorrect}?",
    ],
    scenario: &[
        "Describe a moment from your week where \"{word}\" would have been the perfect word.",
        "Someone asks you to {verb}. Explain what you would do, using \"{word}\".",
        "Write one sentence about your day that naturally uses \"{word}\".",
    ],
    completion: &[
        "Finish this sentence so it uses {word}: \"Looking back, the whole thing came down to ...\"",
        "Finish this sentence so it uses {word}: \"I only understood it after thinking about it twice, because ...\"",
    ],
    application: &[
        "Write a short paragraph explaining \"{word}\" to someone who has never heard it.",
        "Think of a decision you are facing and describe it using \"{word}\".",
    ],
    scenes: AnchorScenes {
        visual_metaphor: "Picture \"{word}\" written in bright letters across a familiar street.",
        story_fragment: "Years from now, you will remember the day you first used \"{word}\" well.",
        sensory_scene: "Feel a quiet morning settle around you as \"{word}\" takes on meaning.",
        power_moment: "You say \"{word}\" with confidence and everyone understands exactly what you mean.",
    },
    reflection: "Where will you use \"{word}\" next?",
};
