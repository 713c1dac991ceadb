/// 사용자 생성
pub const INSERT_USER: &str =
    "INSERT INTO users (username, email) VALUES ($1, $2) RETURNING id, username, email, date_joined";

/// 사용자 조회
pub const GET_USER: &str = "SELECT id, username, email, date_joined FROM users WHERE id = $1";

/// 카테고리 생성
pub const INSERT_CATEGORY: &str = "INSERT INTO categories (name) VALUES ($1) RETURNING id, name";

/// 카테고리 조회
pub const GET_CATEGORY: &str = "SELECT id, name FROM categories WHERE id = $1";

/// 이름으로 카테고리 조회
pub const GET_CATEGORY_BY_NAME: &str = "SELECT id, name FROM categories WHERE name = $1";

/// 모든 카테고리 조회
pub const GET_ALL_CATEGORIES: &str = "SELECT id, name FROM categories ORDER BY name";

/// 상품 생성
pub const INSERT_LISTING: &str = r#"
    INSERT INTO listings (owner_id, title, description, category_id, starting_price, image)
    VALUES ($1, $2, $3, $4, $5, $6)
    RETURNING id, owner_id, title, description, category_id, starting_price, image, created_at, active, winner_id
"#;

/// 상품 조회
pub const GET_LISTING: &str = r#"
    SELECT id, owner_id, title, description, category_id, starting_price, image, created_at, active, winner_id
    FROM listings
    WHERE id = $1
"#;

/// 상품 조회 + 행 잠금 (입찰/종료/댓글 직렬화)
pub const LOCK_LISTING: &str = r#"
    SELECT id, owner_id, title, description, category_id, starting_price, image, created_at, active, winner_id
    FROM listings
    WHERE id = $1
    FOR UPDATE
"#;

/// 진행 중인 상품 + 현재 가격 ($1이 NULL이면 전체 카테고리)
pub const GET_ACTIVE_LISTINGS: &str = r#"
    SELECT l.id, l.owner_id, l.title, l.description, l.category_id, l.starting_price, l.image,
           l.created_at, l.active, l.winner_id,
           COALESCE((SELECT MAX(b.amount) FROM bids b WHERE b.listing_id = l.id), l.starting_price)
               AS current_price
    FROM listings l
    WHERE l.active = TRUE AND ($1::BIGINT IS NULL OR l.category_id = $1)
    ORDER BY l.created_at DESC, l.id DESC
"#;

/// 관심 상품 + 현재 가격
pub const GET_WATCHED_LISTINGS: &str = r#"
    SELECT l.id, l.owner_id, l.title, l.description, l.category_id, l.starting_price, l.image,
           l.created_at, l.active, l.winner_id,
           COALESCE((SELECT MAX(b.amount) FROM bids b WHERE b.listing_id = l.id), l.starting_price)
               AS current_price
    FROM listings l
    JOIN listing_watchers w ON w.listing_id = l.id
    WHERE w.user_id = $1
    ORDER BY l.created_at DESC, l.id DESC
"#;

/// 상품 종료
pub const CLOSE_LISTING: &str = r#"
    UPDATE listings SET active = FALSE, winner_id = $2
    WHERE id = $1
    RETURNING id, owner_id, title, description, category_id, starting_price, image, created_at, active, winner_id
"#;

/// 최고 입찰가 조회
pub const GET_HIGHEST_BID_AMOUNT: &str =
    "SELECT MAX(amount) AS highest_bid FROM bids WHERE listing_id = $1";

/// 최고 입찰 조회
pub const GET_HIGHEST_BID: &str = r#"
    SELECT id, listing_id, bidder_id, amount, created_at
    FROM bids
    WHERE listing_id = $1
    ORDER BY amount DESC, id ASC
    LIMIT 1
"#;

/// 상품 입찰 조회
pub const GET_LISTING_BIDS: &str = r#"
    SELECT id, listing_id, bidder_id, amount, created_at
    FROM bids
    WHERE listing_id = $1
    ORDER BY amount DESC, id ASC
"#;

/// 입찰 저장
pub const INSERT_BID: &str = r#"
    INSERT INTO bids (listing_id, bidder_id, amount)
    VALUES ($1, $2, $3)
    RETURNING id, listing_id, bidder_id, amount, created_at
"#;

/// 상품 댓글 조회
pub const GET_LISTING_COMMENTS: &str = r#"
    SELECT id, listing_id, author_id, text, created_at
    FROM comments
    WHERE listing_id = $1
    ORDER BY created_at DESC, id DESC
"#;

/// 댓글 저장
pub const INSERT_COMMENT: &str = r#"
    INSERT INTO comments (listing_id, author_id, text)
    VALUES ($1, $2, $3)
    RETURNING id, listing_id, author_id, text, created_at
"#;

/// 관심 사용자 조회
pub const GET_LISTING_WATCHERS: &str =
    "SELECT user_id FROM listing_watchers WHERE listing_id = $1 ORDER BY user_id";

/// 관심 목록 추가 (중복 무시)
pub const ADD_WATCHER: &str =
    "INSERT INTO listing_watchers (listing_id, user_id) VALUES ($1, $2) ON CONFLICT DO NOTHING";

/// 관심 목록 제거
pub const REMOVE_WATCHER: &str =
    "DELETE FROM listing_watchers WHERE listing_id = $1 AND user_id = $2";
