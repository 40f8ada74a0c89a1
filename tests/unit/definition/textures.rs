use super::*;

#[test]
fn identical_definitions_share_an_id() {
    let mut cache = TextureCache::new();
    let a = cache.load(TextureDef::new("spark.png"));
    let b = cache.load(TextureDef::new("spark.png"));
    assert_eq!(a, b);
    assert_eq!(cache.len(), 1);
}

#[test]
fn flags_are_part_of_the_key() {
    let mut cache = TextureCache::new();
    let plain = cache.load(TextureDef::new("smoke.png"));
    let repeated = cache.load(TextureDef {
        repeated: true,
        ..TextureDef::new("smoke.png")
    });
    assert_ne!(plain, repeated);
    assert!(cache.get(repeated).unwrap().repeated);
    assert_eq!(cache.iter().map(|(id, _)| id).collect::<Vec<_>>(), [plain, repeated]);
}

#[test]
fn deserialize_defaults_flags() {
    let def: TextureDef = serde_json::from_str(r#"{"path": "a.png"}"#).unwrap();
    assert_eq!(def, TextureDef::new("a.png"));
    assert!(serde_json::from_str::<TextureDef>(r#"{"smooth": false}"#).is_err());
}

#[test]
fn find_does_not_register() {
    let cache = TextureCache::new();
    assert!(cache.find(&TextureDef::new("x.png")).is_none());
    assert!(cache.is_empty());
    assert!(cache.get(TextureId(0)).is_none());
}
