//! Prompt templates and the option tables behind them.

use super::LabelCatalog;
use crate::{Error, ErrorContext, Result};
use once_cell::sync::Lazy;

/// Placeholder left in the prompt when no name is supplied.
pub const NAME_PLACEHOLDER: &str = "{NAME}";

const ANY_LENGTH: &str = "any";

/// Model quantization for the local path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryMode {
    /// 4-bit NF4 with double quantization.
    MaximumSavings,
    /// 8-bit weights.
    Balanced,
    /// Full precision.
    Default,
}

impl MemoryMode {
    pub fn load_in_4bit(&self) -> bool {
        matches!(self, MemoryMode::MaximumSavings)
    }

    pub fn load_in_8bit(&self) -> bool {
        matches!(self, MemoryMode::Balanced)
    }
}

// (label, code, [any length, word count, named length])
static CAPTION_TYPE_TABLE: &[(&str, &str, [&str; 3])] = &[
    (
        "详细描述",
        "Descriptive",
        [
            "Write a detailed description for this image.",
            "Write a detailed description for this image in {word_count} words or less.",
            "Write a {length} detailed description for this image.",
        ],
    ),
    (
        "详细描述（随意）",
        "Descriptive (Casual)",
        [
            "Write a descriptive caption for this image in a casual tone.",
            "Write a descriptive caption for this image in a casual tone within {word_count} words.",
            "Write a {length} descriptive caption for this image in a casual tone.",
        ],
    ),
    (
        "直接描述",
        "Straightforward",
        [
            "Write a straightforward caption for this image. Begin with the main subject and medium. Mention pivotal elements—people, objects, scenery—using confident, definite language. Focus on concrete details like color, shape, texture, and spatial relationships. Show how elements interact. Omit mood and speculative wording. If text is present, quote it exactly. Note any watermarks, signatures, or compression artifacts. Never mention what's absent, resolution, or unobservable details. Vary your sentence structure and keep the description concise, without starting with 'This image is…' or similar phrasing.",
            "Write a straightforward caption for this image within {word_count} words. Begin with the main subject and medium. Mention pivotal elements—people, objects, scenery—using confident, definite language. Focus on concrete details like color, shape, texture, and spatial relationships. Show how elements interact. Omit mood and speculative wording. If text is present, quote it exactly. Note any watermarks, signatures, or compression artifacts. Never mention what's absent, resolution, or unobservable details. Vary your sentence structure and keep the description concise, without starting with 'This image is…' or similar phrasing.",
            "Write a {length} straightforward caption for this image. Begin with the main subject and medium. Mention pivotal elements—people, objects, scenery—using confident, definite language. Focus on concrete details like color, shape, texture, and spatial relationships. Show how elements interact. Omit mood and speculative wording. If text is present, quote it exactly. Note any watermarks, signatures, or compression artifacts. Never mention what's absent, resolution, or unobservable details. Vary your sentence structure and keep the description concise, without starting with 'This image is…' or similar phrasing.",
        ],
    ),
    (
        "Stable Diffusion 提示",
        "Stable Diffusion Prompt",
        [
            "Output a stable diffusion prompt that is indistinguishable from a real stable diffusion prompt.",
            "Output a stable diffusion prompt that is indistinguishable from a real stable diffusion prompt. {word_count} words or less.",
            "Output a {length} stable diffusion prompt that is indistinguishable from a real stable diffusion prompt.",
        ],
    ),
    (
        "MidJourney 提示",
        "MidJourney Prompt",
        [
            "Write a MidJourney prompt for this image.",
            "Write a MidJourney prompt for this image within {word_count} words.",
            "Write a {length} MidJourney prompt for this image.",
        ],
    ),
    (
        "Danbooru 标签列表",
        "Danbooru Tag List",
        [
            "Generate only comma-separated Danbooru tags (lowercase_underscores). Strict order: `artist:`, `copyright:`, `character:`, `meta:`, then general tags. Include counts (1girl), appearance, clothing, accessories, pose, expression, actions, background. Use precise Danbooru syntax. No extra text.",
            "Generate only comma-separated Danbooru tags (lowercase_underscores). Strict order: `artist:`, `copyright:`, `character:`, `meta:`, then general tags. Include counts (1girl), appearance, clothing, accessories, pose, expression, actions, background. Use precise Danbooru syntax. No extra text. {word_count} words or less.",
            "Generate only comma-separated Danbooru tags (lowercase_underscores). Strict order: `artist:`, `copyright:`, `character:`, `meta:`, then general tags. Include counts (1girl), appearance, clothing, accessories, pose, expression, actions, background. Use precise Danbooru syntax. No extra text. {length} length.",
        ],
    ),
    (
        "e621 标签列表",
        "e621 Tag List",
        [
            "Write a comma-separated list of e621 tags in alphabetical order for this image. Start with the artist, copyright, character, species, meta, and lore tags (if any), prefixed by 'artist:', 'copyright:', 'character:', 'species:', 'meta:', and 'lore:'. Then all the general tags.",
            "Write a comma-separated list of e621 tags in alphabetical order for this image. Start with the artist, copyright, character, species, meta, and lore tags (if any), prefixed by 'artist:', 'copyright:', 'character:', 'species:', 'meta:', and 'lore:'. Then all the general tags. Keep it under {word_count} words.",
            "Write a {length} comma-separated list of e621 tags in alphabetical order for this image. Start with the artist, copyright, character, species, meta, and lore tags (if any), prefixed by 'artist:', 'copyright:', 'character:', 'species:', 'meta:', and 'lore:'. Then all the general tags.",
        ],
    ),
    (
        "Rule34 标签列表",
        "Rule34 Tag List",
        [
            "Write a comma-separated list of rule34 tags in alphabetical order for this image. Start with the artist, copyright, character, and meta tags (if any), prefixed by 'artist:', 'copyright:', 'character:', and 'meta:'. Then all the general tags.",
            "Write a comma-separated list of rule34 tags in alphabetical order for this image. Start with the artist, copyright, character, and meta tags (if any), prefixed by 'artist:', 'copyright:', 'character:', and 'meta:'. Then all the general tags. Keep it under {word_count} words.",
            "Write a {length} comma-separated list of rule34 tags in alphabetical order for this image. Start with the artist, copyright, character, and meta tags (if any), prefixed by 'artist:', 'copyright:', 'character:', and 'meta:'. Then all the general tags.",
        ],
    ),
    (
        "Booru-like 标签列表",
        "Booru-like Tag List",
        [
            "Write a list of Booru-like tags for this image.",
            "Write a list of Booru-like tags for this image within {word_count} words.",
            "Write a {length} list of Booru-like tags for this image.",
        ],
    ),
    (
        "艺术评论家",
        "Art Critic",
        [
            "Analyze this image like an art critic would with information about its composition, style, symbolism, the use of color, light, any artistic movement it might belong to, etc.",
            "Analyze this image like an art critic would with information about its composition, style, symbolism, the use of color, light, any artistic movement it might belong to, etc. Keep it within {word_count} words.",
            "Analyze this image like an art critic would with information about its composition, style, symbolism, the use of color, light, any artistic movement it might belong to, etc. Keep it {length}.",
        ],
    ),
    (
        "产品列表",
        "Product Listing",
        [
            "Write a caption for this image as though it were a product listing.",
            "Write a caption for this image as though it were a product listing. Keep it under {word_count} words.",
            "Write a {length} caption for this image as though it were a product listing.",
        ],
    ),
    (
        "社交媒体帖子",
        "Social Media Post",
        [
            "Write a caption for this image as if it were being used for a social media post.",
            "Write a caption for this image as if it were being used for a social media post. Limit the caption to {word_count} words.",
            "Write a {length} caption for this image as if it were being used for a social media post.",
        ],
    ),
];

static EXTRA_OPTION_TABLE: &[(&str, &str)] = &[
    (
        "如果图片中有人物 / 角色，你必须用 {name} 来称呼他们。",
        "If there is a person/character in the image you must refer to them as {name}.",
    ),
    (
        "不要包含无法改变的信息（如种族、性别等），但仍应包含可改变的属性（如发型）。",
        "Do NOT include information about people/characters that cannot be changed (like ethnicity, gender, etc), but do still include changeable attributes (like hair style).",
    ),
    (
        "包含关于照明信息。",
        "Include information about lighting.",
    ),
    (
        "包含关于相机角度的信息。",
        "Include information about camera angle.",
    ),
    (
        "包含关于是否存在水印的信息。",
        "Include information about whether there is a watermark or not.",
    ),
    (
        "包含关于是否存在JPEG伪影的信息。",
        "Include information about whether there are JPEG artifacts or not.",
    ),
    (
        "如果这是一张照片，你必须包含关于相机使用情况的信息以及光圈、快门速度、ISO等细节。",
        "If it is a photo you MUST include information about what camera was likely used and details such as aperture, shutter speed, ISO, etc.",
    ),
    (
        "不要包含任何色情内容；保持它PG级。",
        "Do NOT include anything sexual; keep it PG.",
    ),
    (
        "不要提及图片的分辨率。",
        "Do NOT mention the image's resolution.",
    ),
    (
        "你必须包含关于图片主观审美质量的信息，从低到非常高。",
        "You MUST include information about the subjective aesthetic quality of the image from low to very high.",
    ),
    (
        "包含关于图片构图风格的信息，如引导线、三分法则或对称性。",
        "Include information on the image's composition style, such as leading lines, rule of thirds, or symmetry.",
    ),
    (
        "不要提及图片中的任何文本。",
        "Do NOT mention any text that is in the image.",
    ),
    (
        "指定景深和背景是否聚焦或模糊。",
        "Specify the depth of field and whether the background is in focus or blurred.",
    ),
    (
        "如果适用，提及可能使用的人工或自然光源。",
        "If applicable, mention the likely use of artificial or natural lighting sources.",
    ),
    (
        "不要使用任何模糊的语言。",
        "Do NOT use any ambiguous language.",
    ),
    (
        "包含关于图片是否是SFW、暗示性或NSFW的信息。",
        "Include whether the image is sfw, suggestive, or nsfw.",
    ),
    (
        "只描述图片最重要的元素。",
        "ONLY describe the most important elements of the image.",
    ),
    (
        "如果这是一件艺术品，不要包含艺术家或作品的名称。",
        "If it is a work of art, do not include the artist's name or the title of the work.",
    ),
    (
        "识别图片的方向（肖像、风景或正方形）和明显的宽高比。",
        "Identify the image orientation (portrait, landscape, or square) and aspect ratio if obvious.",
    ),
    (
        "不要使用礼貌的委婉语——倾向于直接、随意的表达。",
        "Do NOT use polite euphemisms—lean into blunt, casual phrasing.",
    ),
    (
        "当适用时，包含关于人物/角色的年龄信息。",
        "Include information about the ages of any people/characters when applicable.",
    ),
    (
        "提及图片是否描绘了极端特写、特写、中特写、中景、牛仔镜头、中远景、远景或极端远景。",
        "Mention whether the image depicts an extreme close-up, close-up, medium close-up, medium shot, cowboy shot, medium wide shot, wide shot, or extreme wide shot.",
    ),
    (
        "不要提及图片的氛围/感觉/等。",
        "Do not mention the mood/feeling/etc of the image.",
    ),
    (
        "明确指定视角高度（眼睛水平、低角度虫眼、鸟瞰、无人机、屋顶等）。",
        "Explicitly specify the vantage height (eye-level, low-angle worm's-eye, bird's-eye, drone, rooftop, etc.).",
    ),
    (
        "如果存在水印，你必须提及它。",
        "If there is a watermark, you must mention it.",
    ),
    (
        "你的回答将被用于一个文本到图像模型，所以避免使用像\"这张图片展示了…\"、\"你在看…\"等无用的元短语。",
        "Your response will be used by a text-to-image model, so avoid useless meta phrases like \"This image shows…\", \"You are looking at...\", etc.",
    ),
];
/// Caption styles; the value holds the three length variants of the template.
pub static CAPTION_TYPES: Lazy<LabelCatalog<[&'static str; 3]>> = Lazy::new(|| {
    let mut catalog = LabelCatalog::new();
    for (label, code, templates) in CAPTION_TYPE_TABLE {
        catalog.register(*label, *code, *templates);
    }
    catalog
});

/// Extra instructions appended to the caption prompt. The first entry is blank.
pub static EXTRA_OPTIONS: Lazy<LabelCatalog<()>> = Lazy::new(|| {
    let mut catalog = LabelCatalog::new();
    catalog.register("", "", ());
    for (label, code) in EXTRA_OPTION_TABLE {
        catalog.register(*label, *code, ());
    }
    catalog
});

/// `any`, named lengths, then word counts 20 through 260.
pub static CAPTION_LENGTHS: Lazy<LabelCatalog<()>> = Lazy::new(|| {
    let mut catalog = LabelCatalog::new()
        .with("任意", ANY_LENGTH, ())
        .with("非常短", "very short", ())
        .with("短", "short", ())
        .with("中等长度", "medium-length", ())
        .with("长", "long", ())
        .with("非常长", "very long", ());
    for words in (20..=260).step_by(10) {
        catalog.register(words.to_string(), words.to_string(), ());
    }
    catalog
});

pub static MEMORY_MODES: Lazy<LabelCatalog<MemoryMode>> = Lazy::new(|| {
    LabelCatalog::new()
        .with("最大节省 (4-bit)", "Maximum Savings (4-bit)", MemoryMode::MaximumSavings)
        .with("平衡 (8-bit)", "Balanced (8-bit)", MemoryMode::Balanced)
        .with("默认模式", "Default", MemoryMode::Default)
});

pub static EXEC_OPTIONS: Lazy<LabelCatalog<()>> = Lazy::new(|| {
    LabelCatalog::new()
        .with("远程", "remote", ())
        .with("本地", "local", ())
});

/// A rendered prompt and a human-readable summary of the choices behind it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltPrompt {
    pub prompt: String,
    pub label: String,
}

/// Render the caption prompt for a type, a length and up to any number of extras.
///
/// Labels or codes are accepted for every choice. An unknown length falls back
/// to `any`; unknown or blank extras are skipped. `{length}` and `{word_count}`
/// are filled with the length code so English templates stay English.
pub fn build_prompt(
    caption_type: &str,
    caption_length: &str,
    extras: &[&str],
    name: &str,
) -> Result<BuiltPrompt> {
    let type_code = CAPTION_TYPES.resolve(caption_type).ok_or_else(|| {
        Error::configuration_with_context(
            format!("unknown caption type '{}'", caption_type),
            ErrorContext::new()
                .with_field_path("caption_type")
                .with_details(format!("expected one of: {}", CAPTION_TYPES.labels().join(", "))),
        )
    })?;
    let templates = CAPTION_TYPES.value_for(type_code).ok_or_else(|| {
        Error::configuration(format!("caption type '{}' has no templates", type_code))
    })?;

    let length_code = CAPTION_LENGTHS.resolve(caption_length).unwrap_or(ANY_LENGTH);
    let template_idx = if length_code == ANY_LENGTH {
        0
    } else if length_code.chars().all(|c| c.is_ascii_digit()) {
        1
    } else {
        2
    };

    let mut prompt = templates[template_idx].to_string();
    let mut label = format!("{}, {}", caption_type, caption_length);

    let chosen: Vec<(&str, &str)> = extras
        .iter()
        .filter(|e| !e.is_empty())
        .filter_map(|e| EXTRA_OPTIONS.resolve(e).map(|code| (*e, code)))
        .filter(|(_, code)| !code.is_empty())
        .collect();
    if !chosen.is_empty() {
        for (_, code) in &chosen {
            prompt.push(' ');
            prompt.push_str(code);
        }
        label.push('\n');
        for (extra, _) in &chosen {
            label.push_str(&format!("- {}\n", extra));
        }
    }

    let name_value = if name.is_empty() { NAME_PLACEHOLDER } else { name };
    let prompt = prompt
        .replace("{name}", name_value)
        .replace("{length}", length_code)
        .replace("{word_count}", length_code);

    if !name.is_empty() {
        label.push_str(&format!("- Name: {}", name));
    }

    Ok(BuiltPrompt { prompt, label })
}
