use super::*;

const CLIENT_DUMP: &str = include_str!("../../data/natural_beauty_client.sql");
const PRODUCT_DUMP: &str = include_str!("../../data/natural_beauty_product.sql");

#[test]
fn literal_typing() {
    assert_eq!(parse_literal("NULL"), SqlLiteral::Null);
    assert_eq!(parse_literal("null"), SqlLiteral::Null);
    assert_eq!(parse_literal("42"), SqlLiteral::Int(42));
    assert_eq!(parse_literal("-7"), SqlLiteral::Int(-7));
    assert_eq!(parse_literal("3.14"), SqlLiteral::Float(3.14));
    assert_eq!(
        parse_literal("'hello'"),
        SqlLiteral::Str("hello".to_string())
    );
    // unquoted non-numeric text survives as a string
    assert_eq!(
        parse_literal("CURRENT_TIMESTAMP"),
        SqlLiteral::Str("CURRENT_TIMESTAMP".to_string())
    );
}

#[test]
fn unescape_covers_the_mysql_set() {
    assert_eq!(mysql_unescape(r"a\'b"), "a'b");
    assert_eq!(mysql_unescape(r#"a\"b"#), "a\"b");
    assert_eq!(mysql_unescape(r"line\nbreak"), "line\nbreak");
    assert_eq!(mysql_unescape(r"tab\there"), "tab\there");
    assert_eq!(mysql_unescape(r"back\\slash"), "back\\slash");
    // unknown escapes keep the backslash
    assert_eq!(mysql_unescape(r"\q"), "\\q");
    // multibyte text passes through untouched
    assert_eq!(mysql_unescape("天然美 \\'spa\\'"), "天然美 'spa'");
}

#[test]
fn records_split_on_depth_zero_commas_only() {
    let rows = extract_values(
        "INSERT INTO `t` VALUES (1,'a,b',2),(3,'c)d',4),(5,NULL,6);",
        "t",
    )
    .unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0][1], SqlLiteral::Str("a,b".to_string()));
    assert_eq!(rows[1][1], SqlLiteral::Str("c)d".to_string()));
    assert!(rows[2][1].is_null());
}

#[test]
fn escaped_quote_does_not_close_the_string() {
    let rows = extract_values(
        r"INSERT INTO `t` VALUES (1,'it\'s, fine'),(2,'plain');",
        "t",
    )
    .unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0][1], SqlLiteral::Str("it's, fine".to_string()));
}

#[test]
fn multiple_insert_statements_accumulate() {
    let sql = "INSERT INTO `t` VALUES (1,'a');\nINSERT INTO `t` VALUES (2,'b');\n";
    let rows = extract_values(sql, "t").unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1][0], SqlLiteral::Int(2));
}

#[test]
fn other_tables_are_ignored() {
    let sql = "INSERT INTO `other` VALUES (1,'a');";
    let rows = extract_values(sql, "t").unwrap();
    assert!(rows.is_empty());
}

#[test]
fn unterminated_insert_is_an_error() {
    let err = extract_values("INSERT INTO `t` VALUES (1,'a')", "t").unwrap_err();
    assert!(matches!(err, DumpError::UnterminatedInsert(_)));
}

#[test]
fn wrong_arity_is_an_error() {
    let err = clients_from_dump("INSERT INTO `client` VALUES (1,'only','two');").unwrap_err();
    assert!(matches!(
        err,
        DumpError::ColumnCount {
            table: "client",
            expected: 6,
            got: 3
        }
    ));
}

#[test]
fn bad_gender_is_an_error() {
    let err = clients_from_dump(
        "INSERT INTO `client` VALUES (1,'X','Q',30,'x','pw');",
    )
    .unwrap_err();
    assert!(matches!(err, DumpError::BadLiteral { column: "gender", .. }));
}

#[test]
fn client_fixture_parses_fully() {
    let clients = clients_from_dump(CLIENT_DUMP).unwrap();
    assert_eq!(clients.len(), 8);

    // document ids are the numeric primary keys
    assert_eq!(clients[0].0, "1");
    assert_eq!(clients[7].0, "8");

    let (_, mei) = &clients[0];
    assert_eq!(mei.name, "Mei Lin");
    assert_eq!(mei.gender, Gender::F);
    assert_eq!(mei.age, 34);
    assert_eq!(mei.username, "meilin");

    // escapes decoded: \' and \\ and \n
    assert_eq!(clients[2].1.password, "jasmine's tea");
    assert_eq!(clients[3].1.name, "Amanda O'Brien");
    assert_eq!(clients[4].1.password, "b4mboo\\grove");
    assert_eq!(clients[5].1.password, "plum\nblossom");

    // usernames are unique (the dump's UNIQUE KEY)
    let mut usernames: Vec<_> = clients.iter().map(|(_, c)| c.username.clone()).collect();
    usernames.sort();
    usernames.dedup();
    assert_eq!(usernames.len(), 8);
}

#[test]
fn product_fixture_parses_fully() {
    let products = products_from_dump(PRODUCT_DUMP).unwrap();
    assert_eq!(products.len(), 6);

    let (_, facial) = &products[0];
    assert_eq!(facial.order_no, "NB-001");
    assert_eq!(facial.price_min, 1200.0);
    assert_eq!(facial.price_max, Some(1800.0));
    // commas and parentheses inside the description stay intact
    assert_eq!(
        facial.description.as_deref(),
        Some("Deep-cleansing facial with hyaluronic serum (60 min), includes neck massage")
    );

    // NULLs map to None
    assert!(products[2].1.description.is_none());
    assert!(products[3].1.price_max.is_none());
    assert_eq!(
        products[3].1.description.as_deref(),
        Some("The 'Glow' series: vitamin C mask, 5 pieces")
    );

    // order numbers are unique (the dump's UNIQUE KEY)
    let mut orders: Vec<_> = products.iter().map(|(_, p)| p.order_no.clone()).collect();
    orders.sort();
    orders.dedup();
    assert_eq!(orders.len(), 6);
}
