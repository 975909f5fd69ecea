use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterStrategy {
    ServerSide,
    ClientSide,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterBinding {
    pub name: &'static str,
    pub fields: &'static [&'static str],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnFormat {
    Text,
    Identifier,
    RichText,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub header: &'static str,
    pub field: &'static str,
    pub format: ColumnFormat,
}

const fn text(header: &'static str, field: &'static str) -> Column {
    Column {
        header,
        field,
        format: ColumnFormat::Text,
    }
}

const fn identifier(header: &'static str, field: &'static str) -> Column {
    Column {
        header,
        field,
        format: ColumnFormat::Identifier,
    }
}

const fn rich_text(header: &'static str, field: &'static str) -> Column {
    Column {
        header,
        field,
        format: ColumnFormat::RichText,
    }
}

pub const CREATOR_SEARCH_FILTER: &str = "q";

const PRODUCT_COLUMNS: &[Column] = &[
    identifier("Product ID", "product_id"),
    identifier("Campaign ID", "campaign_id"),
    text("Name", "name"),
    text("Shop Name", "shop_name"),
    text("Main Image URL", "main_image_url"),
    rich_text("Product Description", "product_description"),
    text("Lowest Price", "lowest_price_amount"),
    text("Highest Price", "highest_price_amount"),
    text("Inventory", "inventory"),
    text("Product Sales", "product_sales"),
    text(
        "Open Collaboration Commission Rate (%)",
        "open_collaboration_commission_rate",
    ),
    text("Partner Commission Rate (%)", "partner_commission_rate"),
    text("Calculated Commission Rate (%)", "calculated_commission_rate"),
];

const CREATOR_COLUMNS: &[Column] = &[
    text("Discord Username", "discord_username"),
    text("TikTok Username", "creator_username"),
    identifier("TikTok User ID", "creator_user_id"),
    identifier("Discord ID", "discord_id"),
    text("Region", "region"),
    text("Created At", "created_at"),
    text("Updated At", "updated_at"),
];

const CAMPAIGN_COLUMNS: &[Column] = &[
    identifier("Campaign ID", "campaign_id"),
    text("Name", "name"),
    text("Campaign Type", "campaign_type"),
    text("Start Date", "campaign_start_date"),
    text("End Date", "campaign_end_date"),
    text("Product Count", "product_count"),
];

const CREATOR_FILTERS: &[FilterBinding] = &[
    FilterBinding {
        name: CREATOR_SEARCH_FILTER,
        fields: &[
            "creator_username",
            "discord_username",
            "creator_user_id",
            "discord_id",
            "region",
        ],
    },
    FilterBinding {
        name: "creator_username",
        fields: &["creator_username"],
    },
    FilterBinding {
        name: "discord_username",
        fields: &["discord_username"],
    },
    FilterBinding {
        name: "region",
        fields: &["region"],
    },
];

const PRODUCT_FILTERS: &[FilterBinding] = &[
    FilterBinding {
        name: "product_id",
        fields: &["product_id"],
    },
    FilterBinding {
        name: "campaign_id",
        fields: &["campaign_id"],
    },
    FilterBinding {
        name: "name",
        fields: &["name"],
    },
    FilterBinding {
        name: "shop_name",
        fields: &["shop_name"],
    },
];

const CAMPAIGN_FILTERS: &[FilterBinding] = &[FilterBinding {
    name: "campaign_type",
    fields: &["campaign_type"],
}];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Products,
    Creators,
    Campaigns,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 3] = [
        ResourceKind::Products,
        ResourceKind::Creators,
        ResourceKind::Campaigns,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Products => "products",
            ResourceKind::Creators => "creators",
            ResourceKind::Campaigns => "campaigns",
        }
    }

    pub fn strategy(self) -> FilterStrategy {
        match self {
            ResourceKind::Creators => FilterStrategy::ClientSide,
            ResourceKind::Products | ResourceKind::Campaigns => FilterStrategy::ServerSide,
        }
    }

    pub fn proxy_route(self) -> &'static str {
        match self {
            ResourceKind::Products => "/api/campaign-products",
            ResourceKind::Creators => "/api/creators",
            ResourceKind::Campaigns => "/api/campaigns",
        }
    }

    pub fn upstream_path(self) -> &'static str {
        match self {
            ResourceKind::Products => "/v1/tiktok/partner/campaigns/products/all/",
            ResourceKind::Creators => "/v1/tiktok/partner/creators/",
            ResourceKind::Campaigns => "/v1/tiktok/partner/campaigns/all/",
        }
    }

    pub fn collection_key(self) -> &'static str {
        self.as_str()
    }

    pub fn id_field(self) -> &'static str {
        match self {
            ResourceKind::Products => "product_id",
            ResourceKind::Creators => "creator_user_id",
            ResourceKind::Campaigns => "campaign_id",
        }
    }

    pub fn filters(self) -> &'static [FilterBinding] {
        match self {
            ResourceKind::Products => PRODUCT_FILTERS,
            ResourceKind::Creators => CREATOR_FILTERS,
            ResourceKind::Campaigns => CAMPAIGN_FILTERS,
        }
    }

    pub fn forwarded_params(self) -> &'static [&'static str] {
        match self {
            ResourceKind::Products => &["product_id", "campaign_id", "name", "shop_name"],
            ResourceKind::Campaigns => &["campaign_type"],
            ResourceKind::Creators => &[],
        }
    }

    pub fn sortable_fields(self) -> &'static [&'static str] {
        match self {
            ResourceKind::Products => &[
                "product_sales",
                "inventory",
                "lowest_price_amount",
                "highest_price_amount",
                "calculated_commission_rate",
            ],
            ResourceKind::Creators => &["follower_count", "gmv", "video_count"],
            ResourceKind::Campaigns => &["product_count"],
        }
    }

    pub fn columns(self) -> &'static [Column] {
        match self {
            ResourceKind::Products => PRODUCT_COLUMNS,
            ResourceKind::Creators => CREATOR_COLUMNS,
            ResourceKind::Campaigns => CAMPAIGN_COLUMNS,
        }
    }

    pub fn export_prefix(self) -> &'static str {
        match self {
            ResourceKind::Products => "tap_campaign_products",
            ResourceKind::Creators => "tap_creators",
            ResourceKind::Campaigns => "tap_campaigns",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "products" | "campaign-products" => Ok(ResourceKind::Products),
            "creators" => Ok(ResourceKind::Creators),
            "campaigns" => Ok(ResourceKind::Campaigns),
            other => Err(format!("unknown resource: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CampaignType {
    #[default]
    All,
    MyCampaigns,
    GsSellingCampaigns,
    SellerCampaigns,
    ExclusiveTiktokShop,
}

impl CampaignType {
    pub const ALL: [CampaignType; 5] = [
        CampaignType::All,
        CampaignType::MyCampaigns,
        CampaignType::GsSellingCampaigns,
        CampaignType::SellerCampaigns,
        CampaignType::ExclusiveTiktokShop,
    ];

    pub fn wire_name(self) -> &'static str {
        match self {
            CampaignType::All => "all",
            CampaignType::MyCampaigns => "MY_CAMPAIGNS",
            CampaignType::GsSellingCampaigns => "GS_SELLING_CAMPAIGNS",
            CampaignType::SellerCampaigns => "SELLER_CAMPAIGNS",
            CampaignType::ExclusiveTiktokShop => "EXCLUSIVE_TIKTOK_SHOP",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CampaignType::All => "All",
            CampaignType::MyCampaigns => "My Campaigns",
            CampaignType::GsSellingCampaigns => "GS Seller Campaigns",
            CampaignType::SellerCampaigns => "Seller Campaigns",
            CampaignType::ExclusiveTiktokShop => "Exclusive TikTok Shop",
        }
    }

    /// `All` is the absence of a filter and is never sent upstream.
    pub fn as_filter(self) -> Option<&'static str> {
        match self {
            CampaignType::All => None,
            other => Some(other.wire_name()),
        }
    }
}

impl FromStr for CampaignType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        CampaignType::ALL
            .into_iter()
            .find(|kind| kind.wire_name().eq_ignore_ascii_case(value))
            .ok_or_else(|| format!("unknown campaign type: {value}"))
    }
}
