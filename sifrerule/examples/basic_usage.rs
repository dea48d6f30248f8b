//! Basic usage example for `sifrerule`.

use sifrerule::prelude::*;

const RULE: &str = r#"
[encryptors.aes]
type = "AES_SIV"
props = { aes-key-value = "01010101010101010101010101010101010101010101010101010101010101010101010101010101010101010101010101010101010101010101010101010101" }

[encryptors.md5]
type = "HMAC_SHA256"
props = { pepper-value = "0202020202020202020202020202020202020202020202020202020202020202" }

[[tables]]
name = "t_order"

[[tables.columns]]
logic_column = "order_id"
cipher_column = "order_id_cipher"
encryptor_name = "aes"
assisted_query_column = "order_id_assisted"
assisted_query_encryptor_name = "md5"
"#;

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    println!("sifrerule Basic Usage Example");
    println!("=============================\n");

    let config = EncryptRuleConfiguration::from_toml_str(RULE)?;
    let rule = EncryptRule::new(&config)?;
    println!("✓ Encrypt rule built ({} encryptors)\n", rule.registry().len());

    let cipher_column = rule.get_cipher_column("t_order", "order_id")?;
    let assisted_column = rule.find_assisted_query_column("t_order", "order_id").unwrap_or("-");
    println!("t_order.order_id -> cipher={cipher_column} assisted={assisted_column}\n");

    // One batch of bound values, NULL included
    let values = [Some(Value::Int(123)), None, Some(Value::Int(456))];

    let cipher = rule.get_encrypt_values("sharding_db", "public", "t_order", "order_id", &values)?;
    for (plain, encrypted) in values.iter().zip(&cipher) {
        println!("  {plain:?} -> {encrypted:?}");
    }
    println!("✓ Encrypted {} values\n", cipher.len());

    let plain = rule.get_decrypt_values("sharding_db", "public", "t_order", "order_id", &cipher)?;
    println!("✓ Decrypted: {plain:?}\n");

    // Equality predicates compare assisted-query indexes
    let index = rule.get_encrypt_assisted_query_values(
        "sharding_db",
        "public",
        "T_ORDER",
        "ORDER_ID",
        &[Some(Value::Int(123))],
    )?;
    println!("Assisted query index for 123: {index:?}");
    println!("✓ Identifier case does not change the index\n");

    println!("=============================");
    println!("All operations successful!");

    Ok(())
}
