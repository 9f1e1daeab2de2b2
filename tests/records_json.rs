use pokemon_sv_scraper::output::write_json_array;
use pokemon_sv_scraper::{Ability, AbilitySlots, BaseStats, Move, Pokemon};
use serde_json::{Value, json};

fn bulbasaur(abilities: AbilitySlots, type_2: Option<i32>) -> Pokemon {
    Pokemon {
        pokemon_id: "n1".to_string(),
        name: "フシギダネ".to_string(),
        type_1: 12,
        type_2,
        abilities,
        stats: BaseStats {
            h: 45,
            a: 49,
            b: 49,
            c: 65,
            d: 65,
            s: 45,
        },
        level_moves: vec![22, 33, 33],
        machine_moves: vec![92],
        egg_moves: vec![],
        image_url: "https://img.yakkun.com/poke/icon96/n1.gif".to_string(),
    }
}

#[test]
fn test_pokemon_flattens_to_record_shape() {
    let value = serde_json::to_value(bulbasaur(AbilitySlots::One(65), None)).unwrap();
    assert_eq!(
        value,
        json!({
            "pokemon_id": "n1",
            "name": "フシギダネ",
            "type_1": 12,
            "type_2": null,
            "ability_1": 65,
            "ability_2": null,
            "hidden_ability": null,
            "h": 45,
            "a": 49,
            "b": 49,
            "c": 65,
            "d": 65,
            "s": 45,
            "levelMoves": [22, 33, 33],
            "machineMoves": [92],
            "eggMoves": [],
            "imageUrl": "https://img.yakkun.com/poke/icon96/n1.gif"
        })
    );
}

#[test]
fn test_two_abilities_fill_hidden_slot() {
    let abilities = AbilitySlots::Two {
        primary: 65,
        hidden: 34,
    };
    let value = serde_json::to_value(bulbasaur(abilities, Some(8))).unwrap();
    assert_eq!(value["ability_1"], json!(65));
    assert_eq!(value["ability_2"], Value::Null);
    assert_eq!(value["hidden_ability"], json!(34));
    assert_eq!(value["type_2"], json!(8));
}

#[test]
fn test_pokemon_round_trip() {
    for abilities in [
        AbilitySlots::One(65),
        AbilitySlots::Two {
            primary: 65,
            hidden: 34,
        },
        AbilitySlots::Three {
            primary: 22,
            secondary: 65,
            hidden: 34,
        },
    ] {
        for type_2 in [None, Some(8)] {
            let original = bulbasaur(abilities, type_2);
            let text = serde_json::to_string(&original).unwrap();
            let parsed: Pokemon = serde_json::from_str(&text).unwrap();
            assert_eq!(parsed, original);
        }
    }
}

#[test]
fn test_secondary_without_hidden_is_rejected() {
    let mut value = serde_json::to_value(bulbasaur(AbilitySlots::One(65), None)).unwrap();
    value["ability_2"] = json!(34);
    assert!(serde_json::from_value::<Pokemon>(value).is_err());
}

#[test]
fn test_move_and_ability_round_trip_through_file() {
    let dir = tempfile::tempdir().unwrap();

    let moves = vec![Move {
        move_id: 33,
        name: "たいあたり".to_string(),
        move_type: 0,
        category: 1,
        power: 40,
        accuracy: 100,
        pp: 35,
        target: 0,
        is_direct: true,
        can_protect: true,
        magic_coat: false,
        snatch: false,
        mirror_move: true,
        substitute: false,
        description: "相手に体当たりして攻撃する。".to_string(),
    }];
    let move_path = dir.path().join("move.json");
    write_json_array(&move_path, &moves).unwrap();
    let parsed: Vec<Move> =
        serde_json::from_str(&std::fs::read_to_string(&move_path).unwrap()).unwrap();
    assert_eq!(parsed, moves);

    let abilities = vec![Ability {
        ability_id: 55,
        name: "Overgrow".to_string(),
        description: "Boosts grass moves.".to_string(),
    }];
    let ability_path = dir.path().join("ability.json");
    write_json_array(&ability_path, &abilities).unwrap();
    let raw: Value = serde_json::from_str(&std::fs::read_to_string(&ability_path).unwrap()).unwrap();
    assert_eq!(
        raw,
        json!([{ "ability_id": 55, "name": "Overgrow", "description": "Boosts grass moves." }])
    );
}
