use serde::{Deserialize, Serialize};

use crate::types::{Persona, SceneConfig};

pub const QUALITY_SUFFIX: &str = "professional photography, ultra-detailed, shot on Sony A7R IV, 85mm lens, RAW photo, photorealistic, 8k uhd";

const MINIMAL_BACKGROUND: &str = "Clean/Minimal";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredPrompt {
    pub scene: String,
    pub subjects: String,
    pub style: String,
    pub lighting: String,
    pub camera: CameraSpec,
    pub color_palette: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraSpec {
    pub angle: String,
    pub distance: String,
}

pub fn build_prompt(persona: &Persona, scene: &SceneConfig) -> String {
    let mut parts: Vec<String> = Vec::new();

    push_nonempty(&mut parts, build_subject_description(persona));
    push_nonempty(&mut parts, build_scene_description(scene));

    if !scene.outfit.is_empty() {
        let outfit_desc = if scene.outfit_details.is_empty() {
            format!("wearing {}", scene.outfit)
        } else {
            format!("wearing {}, {}", scene.outfit, scene.outfit_details)
        };
        parts.push(outfit_desc);
    }

    push_nonempty(&mut parts, build_technical_description(scene));
    push_nonempty(&mut parts, build_style_description(persona, scene));

    if !scene.custom_prompt.is_empty() {
        parts.push(scene.custom_prompt.clone());
    }

    parts.push(QUALITY_SUFFIX.to_string());

    parts.join(". ")
}

pub fn build_portrait_prompt(persona: &Persona) -> String {
    build_prompt(persona, &portrait_scene())
}

pub fn build_structured_prompt(persona: &Persona, scene: &SceneConfig) -> StructuredPrompt {
    StructuredPrompt {
        scene: build_scene_description(scene),
        subjects: build_subject_description(persona),
        style: build_style_description(persona, scene),
        lighting: default_if_empty(&scene.lighting, "Natural Daylight"),
        camera: CameraSpec {
            angle: default_if_empty(&scene.camera_angle, "Eye Level"),
            distance: default_if_empty(&scene.camera_distance, "Medium Shot"),
        },
        color_palette: persona.style.color_palette.clone(),
    }
}

fn portrait_scene() -> SceneConfig {
    SceneConfig {
        setting: "Studio (White Background)".to_string(),
        pose: "Three-Quarter Profile".to_string(),
        outfit: String::new(),
        outfit_details: String::new(),
        lighting: "Studio Softbox".to_string(),
        camera_angle: "Eye Level".to_string(),
        camera_distance: "Close-up (Face)".to_string(),
        mood: "Serene".to_string(),
        props: Vec::new(),
        background: MINIMAL_BACKGROUND.to_string(),
        time_of_day: "Afternoon".to_string(),
        custom_prompt: String::new(),
    }
}

fn build_subject_description(persona: &Persona) -> String {
    let face = &persona.face;
    let body = &persona.body;
    let mut parts: Vec<String> = Vec::new();

    let age_desc = if face.age.contains('-') {
        format!("{} year old", face.age)
    } else {
        face.age.clone()
    };
    let identity = join_words(&[age_desc, face.ethnicity.clone(), face.gender.to_lowercase()]);
    if !identity.is_empty() {
        parts.push(format!("A stunning {identity}"));
    }

    let mut face_details: Vec<String> = Vec::new();
    if !face.skin_tone.is_empty() {
        face_details.push(format!("{} skin", face.skin_tone.to_lowercase()));
    }
    if !face.face_shape.is_empty() {
        face_details.push(format!("{} face", face.face_shape.to_lowercase()));
    }
    let eyes = join_words(&[face.eye_color.to_lowercase(), face.eye_shape.to_lowercase()]);
    if !eyes.is_empty() {
        face_details.push(format!("{eyes} eyes"));
    }
    let hair = join_words(&[
        face.hair_length.to_lowercase(),
        face.hair_style.to_lowercase(),
        face.hair_color.to_lowercase(),
    ]);
    if !hair.is_empty() {
        face_details.push(format!("{hair} hair"));
    }
    let features: Vec<String> = face
        .features
        .iter()
        .filter(|feature| !feature.is_empty())
        .map(|feature| feature.to_lowercase())
        .collect();
    if !features.is_empty() {
        face_details.push(format!("with {}", features.join(", ")));
    }
    if !face_details.is_empty() {
        parts.push(format!("with {}", face_details.join(", ")));
    }

    if !face.expression.is_empty() {
        parts.push(format!("{} expression", face.expression.to_lowercase()));
    }

    let mut body_parts: Vec<String> = Vec::new();
    let build = join_words(&[body.body_type.to_lowercase(), body.build.to_lowercase()]);
    if !build.is_empty() {
        body_parts.push(format!("{build} build"));
    }
    if !body.height.is_empty() {
        body_parts.push(body.height.clone());
    }
    if !body.skin_texture.is_empty() {
        body_parts.push(format!("{} skin", body.skin_texture.to_lowercase()));
    }
    if !body_parts.is_empty() {
        parts.push(body_parts.join(", "));
    }

    parts.join(", ")
}

fn build_scene_description(scene: &SceneConfig) -> String {
    let mut parts: Vec<String> = Vec::new();

    if !scene.setting.is_empty() {
        parts.push(format!("in {}", scene.setting.to_lowercase()));
    }
    if !scene.pose.is_empty() {
        parts.push(scene.pose.to_lowercase());
    }
    if !scene.background.is_empty() && scene.background != MINIMAL_BACKGROUND {
        parts.push(format!("{} background", scene.background.to_lowercase()));
    }
    if !scene.time_of_day.is_empty() {
        parts.push(format!("during {}", scene.time_of_day.to_lowercase()));
    }
    let props: Vec<String> = scene
        .props
        .iter()
        .filter(|prop| !prop.is_empty())
        .cloned()
        .collect();
    if !props.is_empty() {
        parts.push(format!("with {}", props.join(", ")));
    }

    parts.join(", ")
}

fn build_technical_description(scene: &SceneConfig) -> String {
    let mut parts: Vec<String> = Vec::new();

    if !scene.lighting.is_empty() {
        parts.push(format!("{} lighting", scene.lighting.to_lowercase()));
    }
    if !scene.camera_angle.is_empty() {
        parts.push(format!("{} camera angle", scene.camera_angle.to_lowercase()));
    }
    if !scene.camera_distance.is_empty() {
        parts.push(format!("{} shot", scene.camera_distance.to_lowercase()));
    }

    parts.join(", ")
}

fn build_style_description(persona: &Persona, scene: &SceneConfig) -> String {
    let mut parts: Vec<String> = Vec::new();

    if !scene.mood.is_empty() {
        parts.push(format!("{} mood", scene.mood.to_lowercase()));
    }
    if !persona.style.aesthetic.is_empty() {
        parts.push(format!("{} aesthetic", persona.style.aesthetic.to_lowercase()));
    }
    let vibes: Vec<String> = persona
        .style
        .vibe_keywords
        .iter()
        .filter(|keyword| !keyword.is_empty())
        .map(|keyword| keyword.to_lowercase())
        .collect();
    if !vibes.is_empty() {
        parts.push(vibes.join(", "));
    }

    parts.join(", ")
}

fn push_nonempty(parts: &mut Vec<String>, part: String) {
    if !part.is_empty() {
        parts.push(part);
    }
}

fn join_words(words: &[String]) -> String {
    words
        .iter()
        .filter(|word| !word.is_empty())
        .cloned()
        .collect::<Vec<_>>()
        .join(" ")
}

fn default_if_empty(value: &str, default: &str) -> String {
    if value.is_empty() {
        default.to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BodyConfig, FaceConfig, StyleConfig};
    use chrono::Utc;

    fn test_persona() -> Persona {
        Persona {
            id: "persona-1".to_string(),
            name: "Test Persona".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            thumbnail: None,
            face: FaceConfig::default(),
            body: BodyConfig::default(),
            style: StyleConfig::default(),
            reference_images: Vec::new(),
            seed: None,
        }
    }

    fn assert_clean_separators(prompt: &str) {
        assert!(!prompt.contains("  "), "double space in: {prompt}");
        assert!(!prompt.contains(", ,"), "dangling comma in: {prompt}");
        assert!(!prompt.contains(". ."), "dangling period in: {prompt}");
        assert!(!prompt.contains(" ,"), "space before comma in: {prompt}");
        assert!(!prompt.starts_with(", "), "leading separator in: {prompt}");
    }

    #[test]
    fn builds_full_prompt_for_default_persona_and_scene() {
        let prompt = build_prompt(&test_persona(), &SceneConfig::default());
        assert_eq!(
            prompt,
            "A stunning 23-27 year old European female, with medium skin, oval face, \
             brown almond eyes, shoulder-length wavy dark brown hair, neutral/confident \
             expression, athletic toned build, Average (5'4-5'6), glowing skin. \
             in studio (white background), standing confident, during afternoon. \
             wearing Casual Streetwear. natural daylight lighting, eye level camera angle, \
             medium shot (waist) shot. empowering mood, clean girl aesthetic, aspirational, \
             authentic. professional photography, ultra-detailed, shot on Sony A7R IV, \
             85mm lens, RAW photo, photorealistic, 8k uhd"
        );
    }

    #[test]
    fn identical_inputs_produce_identical_prompts() {
        let persona = test_persona();
        let scene = SceneConfig::default();
        assert_eq!(build_prompt(&persona, &scene), build_prompt(&persona, &scene));
    }

    #[test]
    fn age_without_range_is_used_verbatim() {
        let mut persona = test_persona();
        persona.face.age = "young adult".to_string();
        let prompt = build_prompt(&persona, &SceneConfig::default());
        assert!(prompt.starts_with("A stunning young adult European female"));
        assert!(!prompt.contains("year old"));
    }

    #[test]
    fn blank_outfit_omits_wearing_clause() {
        let mut scene = SceneConfig::default();
        scene.outfit = String::new();
        let prompt = build_prompt(&test_persona(), &scene);
        assert!(!prompt.contains("wearing"));
        assert_clean_separators(&prompt);
    }

    #[test]
    fn outfit_details_extend_the_wearing_clause() {
        let mut scene = SceneConfig::default();
        scene.outfit_details = "oversized knit sweater".to_string();
        let prompt = build_prompt(&test_persona(), &scene);
        assert!(prompt.contains("wearing Casual Streetwear, oversized knit sweater"));
    }

    #[test]
    fn clean_minimal_background_is_suppressed() {
        let prompt = build_prompt(&test_persona(), &SceneConfig::default());
        assert!(!prompt.contains("clean/minimal"));

        let mut scene = SceneConfig::default();
        scene.background = "Urban Rooftop".to_string();
        let prompt = build_prompt(&test_persona(), &scene);
        assert!(prompt.contains("urban rooftop background"));
    }

    #[test]
    fn props_keep_their_original_casing() {
        let mut scene = SceneConfig::default();
        scene.props = vec!["MacBook Pro".to_string(), "iced latte".to_string()];
        let prompt = build_prompt(&test_persona(), &scene);
        assert!(prompt.contains("with MacBook Pro, iced latte"));
    }

    #[test]
    fn features_are_lowercased_and_joined() {
        let mut persona = test_persona();
        persona.face.features = vec!["Freckles".to_string(), "Dimples".to_string()];
        let prompt = build_prompt(&persona, &SceneConfig::default());
        assert!(prompt.contains("hair, with freckles, dimples"));
    }

    #[test]
    fn custom_prompt_is_appended_before_quality_suffix() {
        let mut scene = SceneConfig::default();
        scene.custom_prompt = "holding a matcha latte".to_string();
        let prompt = build_prompt(&test_persona(), &scene);
        let custom_at = prompt.find("holding a matcha latte").unwrap();
        let suffix_at = prompt.find(QUALITY_SUFFIX).unwrap();
        assert!(custom_at < suffix_at);
        assert!(prompt.ends_with(QUALITY_SUFFIX));
    }

    #[test]
    fn blanking_attributes_never_leaves_dangling_separators() {
        let mutations: Vec<Box<dyn Fn(&mut Persona, &mut SceneConfig)>> = vec![
            Box::new(|p, _| p.face.skin_tone = String::new()),
            Box::new(|p, _| p.face.face_shape = String::new()),
            Box::new(|p, _| p.face.eye_color = String::new()),
            Box::new(|p, _| p.face.eye_shape = String::new()),
            Box::new(|p, _| p.face.hair_color = String::new()),
            Box::new(|p, _| p.face.expression = String::new()),
            Box::new(|p, _| p.body.height = String::new()),
            Box::new(|p, _| p.body.skin_texture = String::new()),
            Box::new(|p, _| p.style.aesthetic = String::new()),
            Box::new(|p, _| p.style.vibe_keywords = Vec::new()),
            Box::new(|_, s| s.setting = String::new()),
            Box::new(|_, s| s.pose = String::new()),
            Box::new(|_, s| s.lighting = String::new()),
            Box::new(|_, s| s.camera_angle = String::new()),
            Box::new(|_, s| s.camera_distance = String::new()),
            Box::new(|_, s| s.mood = String::new()),
            Box::new(|_, s| s.time_of_day = String::new()),
        ];

        for mutate in mutations {
            let mut persona = test_persona();
            let mut scene = SceneConfig::default();
            mutate(&mut persona, &mut scene);
            let prompt = build_prompt(&persona, &scene);
            assert_clean_separators(&prompt);
            assert!(prompt.ends_with(QUALITY_SUFFIX));
        }
    }

    #[test]
    fn blank_setting_drops_only_the_setting_clause() {
        let mut scene = SceneConfig::default();
        scene.setting = String::new();
        let prompt = build_prompt(&test_persona(), &scene);
        assert!(!prompt.contains("in studio"));
        assert!(prompt.contains("standing confident, during afternoon"));
    }

    #[test]
    fn fully_blank_inputs_reduce_to_the_quality_suffix() {
        let mut persona = test_persona();
        persona.face = FaceConfig {
            ethnicity: String::new(),
            age: String::new(),
            gender: String::new(),
            skin_tone: String::new(),
            face_shape: String::new(),
            eye_color: String::new(),
            eye_shape: String::new(),
            hair_color: String::new(),
            hair_style: String::new(),
            hair_length: String::new(),
            features: Vec::new(),
            expression: String::new(),
        };
        persona.body = BodyConfig {
            body_type: String::new(),
            height: String::new(),
            build: String::new(),
            skin_texture: String::new(),
        };
        persona.style.aesthetic = String::new();
        persona.style.vibe_keywords = Vec::new();
        let scene = SceneConfig {
            setting: String::new(),
            pose: String::new(),
            outfit: String::new(),
            outfit_details: String::new(),
            lighting: String::new(),
            camera_angle: String::new(),
            camera_distance: String::new(),
            mood: String::new(),
            props: Vec::new(),
            background: String::new(),
            time_of_day: String::new(),
            custom_prompt: String::new(),
        };
        assert_eq!(build_prompt(&persona, &scene), QUALITY_SUFFIX);
    }

    #[test]
    fn portrait_prompt_uses_fixed_studio_scene() {
        let prompt = build_portrait_prompt(&test_persona());
        assert!(prompt.contains("in studio (white background), three-quarter profile, during afternoon"));
        assert!(prompt.contains("studio softbox lighting, eye level camera angle, close-up (face) shot"));
        assert!(prompt.contains("serene mood"));
        assert!(!prompt.contains("wearing"));
        assert!(prompt.ends_with(QUALITY_SUFFIX));
    }

    #[test]
    fn structured_prompt_mirrors_the_flat_clauses() {
        let persona = test_persona();
        let scene = SceneConfig::default();
        let structured = build_structured_prompt(&persona, &scene);
        assert_eq!(structured.scene, "in studio (white background), standing confident, during afternoon");
        assert!(structured.subjects.starts_with("A stunning 23-27 year old European female"));
        assert_eq!(structured.style, "empowering mood, clean girl aesthetic, aspirational, authentic");
        assert_eq!(structured.lighting, "Natural Daylight");
        assert_eq!(structured.camera.angle, "Eye Level");
        assert_eq!(structured.camera.distance, "Medium Shot (Waist)");
        assert_eq!(structured.color_palette, persona.style.color_palette);
    }

    #[test]
    fn structured_prompt_defaults_lighting_and_camera_when_blank() {
        let mut scene = SceneConfig::default();
        scene.lighting = String::new();
        scene.camera_angle = String::new();
        scene.camera_distance = String::new();
        let structured = build_structured_prompt(&test_persona(), &scene);
        assert_eq!(structured.lighting, "Natural Daylight");
        assert_eq!(structured.camera.angle, "Eye Level");
        assert_eq!(structured.camera.distance, "Medium Shot");
    }
}
