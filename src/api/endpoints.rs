// Riot web API and Data Dragon endpoint fragments

pub const ACCOUNT_BY_RIOT_ID: &str = "/riot/account/v1/accounts/by-riot-id";
pub const MATCH_IDS_BY_PUUID: &str = "/lol/match/v5/matches/by-puuid";
pub const MATCH_BY_ID: &str = "/lol/match/v5/matches";
pub const DATA_DRAGON_CDN: &str = "https://ddragon.leagueoflegends.com/cdn";

/// Account-v1 and Match-v5 live on the regional cluster, not the platform host.
pub fn regional_host(routing: &str) -> String {
    format!("https://{}.api.riotgames.com", routing)
}

pub fn runes_reforged_url(version: &str) -> String {
    format!("{}/{}/data/en_US/runesReforged.json", DATA_DRAGON_CDN, version)
}

pub fn rune_icon_url(icon_path: &str) -> String {
    format!("{}/img/{}", DATA_DRAGON_CDN, icon_path)
}
