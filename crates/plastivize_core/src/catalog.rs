//! crates/plastivize_core/src/catalog.rs
//!
//! Static catalogs: the achievement ladder and the marketplace inventory.
//! Both are immutable, loaded at start, and referenced by id from the
//! persisted aggregate.

/// A one-time badge, unlocked permanently once the scan count reaches
/// `threshold`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Achievement {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub threshold: u32,
}

/// Ordered by ascending threshold for display; unlock evaluation does not
/// depend on the order.
pub const ALL_ACHIEVEMENTS: &[Achievement] = &[
    Achievement {
        id: "scan1",
        name: "First Scan",
        description: "Scan your first item.",
        icon: "🌱",
        threshold: 1,
    },
    Achievement {
        id: "scan10",
        name: "Recycle Starter",
        description: "Scan 10 items.",
        icon: "♻️",
        threshold: 10,
    },
    Achievement {
        id: "scan50",
        name: "Eco Warrior",
        description: "Scan 50 items.",
        icon: "🛡️",
        threshold: 50,
    },
];

/// A community marketplace entry unlockable by spending eco-points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarketplaceItemData {
    pub id: &'static str,
    pub creator: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub cost: u32,
}

pub const MARKETPLACE_ITEMS: &[MarketplaceItemData] = &[
    MarketplaceItemData {
        id: "item_planter",
        creator: "Creative Crafts",
        title: "PET Bottle Planters",
        description: "Give plastic bottles a new life as beautiful planters.",
        cost: 100,
    },
    MarketplaceItemData {
        id: "item_cap_art",
        creator: "Art From Waste",
        title: "HDPE Bottle Cap Art",
        description: "Vibrant mosaic art from recycled bottle caps.",
        cost: 250,
    },
    MarketplaceItemData {
        id: "item_tote_bag",
        creator: "Eco Threads",
        title: "Woven Plastic Tote Bag",
        description: "A durable and stylish tote bag woven from plastic strips.",
        cost: 400,
    },
    MarketplaceItemData {
        id: "item_coasters",
        creator: "Melt & Mold",
        title: "Recycled Coasters Set",
        description: "Colorful coasters made from melted and molded HDPE plastic.",
        cost: 150,
    },
];

/// Looks up a marketplace item by its id.
pub fn find_marketplace_item(item_id: &str) -> Option<&'static MarketplaceItemData> {
    MARKETPLACE_ITEMS.iter().find(|item| item.id == item_id)
}

pub fn find_achievement(achievement_id: &str) -> Option<&'static Achievement> {
    ALL_ACHIEVEMENTS.iter().find(|a| a.id == achievement_id)
}
