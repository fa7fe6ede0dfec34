//! Static genre keyword and search-query tables
//!
//! Keywords indicate a genre when found (case-insensitively) in a track
//! title. Multi-word keywords weigh more than single words during
//! detection. Table order matters: detection ties resolve to the genre
//! listed first.

/// Genre assigned when no keyword matches
pub const DEFAULT_GENRE: &str = "pop";

/// Genre → title keywords that indicate it
pub const GENRE_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "edm",
        &[
            "edm", "electronic", "electro", "electronica", "dance music",
            "house", "deep house", "progressive house", "future house", "bass house", "tech house",
            "techno", "minimal techno", "detroit techno",
            "trance", "uplifting trance", "psytrance", "progressive trance", "vocal trance",
            "dubstep", "brostep", "riddim", "melodic dubstep",
            "drum and bass", "dnb", "liquid dnb", "neurofunk", "jungle",
            "hardstyle", "hardcore", "gabber", "happy hardcore",
            "future bass", "tropical house", "moombahton", "big room",
            "electro swing", "synthwave", "retrowave", "outrun",
            "remix", "bootleg", "mashup", "drop", "bass drop", "bass boosted",
            "dj", "dj mix", "club mix", "festival", "rave",
            "marshmello", "alan walker", "martin garrix", "avicii", "tiesto",
            "david guetta", "calvin harris", "deadmau5", "skrillex", "diplo",
            "zedd", "kygo", "illenium", "said the sky", "seven lions",
            "excision", "rezz", "virtual riot", "slander", "nghtmre",
            "armin van buuren", "above beyond", "gareth emery", "paul van dyk",
            "hardwell", "afrojack", "steve aoki", "dimitri vegas", "like mike",
            "porter robinson", "madeon", "flume", "odesza", "rufus du sol",
            "major lazer", "dj snake", "yellow claw", "r3hab", "don diablo",
        ],
    ),
    (
        "ballad",
        &[
            "ballad", "slow", "slow song", "power ballad",
            "acoustic", "unplugged", "live acoustic",
            "piano", "piano cover", "piano version",
            "emotional", "sad", "sad song", "heartbreak", "breakup",
            "love song", "romantic", "romance",
            "nhạc buồn", "buồn", "tâm trạng", "nhạc tâm trạng",
            "ballad việt", "nhạc trữ tình", "trữ tình",
            "nhạc sến", "bolero",
            "korean ballad", "kballad", "ost", "drama ost", "kdrama ost",
        ],
    ),
    (
        "rap",
        &[
            "rap", "hip hop", "hiphop", "hip-hop",
            "trap", "trap music", "drill", "uk drill", "ny drill",
            "underground", "underground rap",
            "boom bap", "old school hip hop", "new school",
            "mumble rap", "cloud rap", "emo rap", "rage",
            "gangsta rap", "g-funk", "west coast", "east coast",
            "southern hip hop", "dirty south", "crunk",
            "freestyle", "cypher", "type beat", "producer",
            "diss track", "beef", "mixtape",
            "rap việt", "underground việt", "rapper việt",
            "đen vâu", "đen", "binz", "rhymastic", "karik", "suboi",
            "wowy", "gducky", "rpt mck", "rptonit", "obito", "low g",
            "dế choắt", "gonzo", "blacka", "lil wuyn", "andree",
            "seachains", "tage", "wxrdie", "hieuthuhai", "negav",
            "ban ca lang", "16 typh", "16typh", "sol7", "vsoul",
            "eminem", "drake", "kendrick lamar", "j cole", "kanye west",
            "travis scott", "lil uzi vert", "playboi carti", "21 savage",
            "post malone", "juice wrld", "xxxtentacion", "lil peep",
            "migos", "future", "young thug", "gunna", "lil baby",
            "dababy", "roddy ricch", "pop smoke", "nba youngboy",
            "tyler the creator", "asap rocky", "denzel curry", "jid",
        ],
    ),
    (
        "rock",
        &[
            "rock", "rock music", "rock and roll", "rock n roll",
            "hard rock", "classic rock", "soft rock",
            "alternative rock", "alt rock", "indie rock",
            "punk rock", "punk", "pop punk", "emo", "screamo",
            "metal", "heavy metal", "death metal", "black metal",
            "thrash metal", "nu metal", "metalcore", "deathcore",
            "progressive rock", "prog rock", "art rock",
            "grunge", "post grunge", "garage rock",
            "psychedelic rock", "stoner rock", "southern rock",
            "guitar solo", "guitar", "electric guitar", "riff",
            "live concert", "rock concert", "stadium rock",
            "the beatles", "led zeppelin", "pink floyd", "queen",
            "nirvana", "foo fighters", "red hot chili peppers", "rhcp",
            "linkin park", "green day", "blink 182", "my chemical romance",
            "paramore", "fall out boy", "panic at the disco",
            "metallica", "iron maiden", "black sabbath", "ac dc", "acdc",
            "guns n roses", "bon jovi", "aerosmith", "van halen",
            "arctic monkeys", "the strokes", "radiohead", "coldplay",
            "imagine dragons", "one republic", "onerepublic", "maroon 5",
            "twenty one pilots", "the 1975", "muse", "u2",
        ],
    ),
    (
        "vpop",
        &[
            "vpop", "v-pop", "nhạc việt", "nhạc trẻ", "việt nam",
            "nhạc pop việt", "pop việt nam",
            "sơn tùng", "sơn tùng mtp", "mtp", "sơn tùng m-tp",
            "jack", "j97", "jack 97",
            "erik", "đức phúc", "noo phước thịnh",
            "bùi anh tuấn", "khởi my", "kelvin khánh",
            "châu khải phong", "ưng hoàng phúc", "lam trường",
            "tuấn hưng", "đàm vĩnh hưng", "mr đàm",
            "quang lê", "đan trường", "phan mạnh quỳnh",
            "kay trần", "mono", "justatee", "binz",
            "soobin hoàng sơn", "hoàng dũng",
            "vũ", "vũ cát tường", "anh tú", "grey d", "greyd",
            "mỹ tâm", "hồ ngọc hà", "thu minh",
            "đông nhi", "bích phương", "min", "amee",
            "hoàng thùy linh", "chi pu", "hương tràm",
            "văn mai hương", "thủy tiên", "phương ly",
            "thiều bảo trâm", "bảo anh", "hiền hồ",
            "tóc tiên", "hari won", "liz kim cương",
            "juky san", "orange", "lyly", "hòa minzy",
            "hương giang", "phương mỹ chi",
            "365", "365daband", "monstar", "uni5",
            "suni hạ linh", "rtee", "mr siro",
            "vicky nhung", "osad", "rpt orijinn",
        ],
    ),
    (
        "kpop",
        &[
            "kpop", "k-pop", "korean pop", "korean", "nhạc hàn",
            "kpop 2024", "kpop dance", "kpop cover",
            "bts", "bangtan", "방탄소년단",
            "exo", "nct", "nct 127", "nct dream", "wayv",
            "seventeen", "svt", "세븐틴",
            "stray kids", "skz", "straykids",
            "txt", "tomorrow x together",
            "enhypen", "ateez", "the boyz",
            "treasure", "monsta x", "got7", "2pm",
            "shinee", "super junior", "suju",
            "bigbang", "winner", "ikon", "zerobaseone",
            "riize", "boynextdoor",
            "blackpink", "블랙핑크", "twice", "트와이스",
            "red velvet", "레드벨벳", "aespa", "에스파",
            "itzy", "있지", "gidle", "g idle", "(g)i-dle",
            "ive", "아이브", "newjeans", "뉴진스",
            "le sserafim", "lesserafim", "nmixx",
            "mamamoo", "gfriend", "oh my girl",
            "2ne1", "girls generation", "snsd", "소녀시대",
            "everglow", "stayc", "fromis 9", "dreamcatcher",
            "loona", "이달의 소녀", "kep1er", "wjsn",
            "babymonster", "illit", "kiss of life",
            "iu", "아이유", "taeyeon", "sunmi", "chungha",
            "hwasa", "somi", "jennie", "rose", "rosé", "lisa",
            "jungkook", "jimin", "suga", "rm", "jin",
            "baekhyun", "kai", "taemin", "key",
            "g dragon", "gd", "taeyang", "daesung",
            "zico", "dean", "crush", "jay park",
            "sm entertainment", "jyp", "yg", "hybe", "starship",
        ],
    ),
    (
        "jpop",
        &[
            "jpop", "j-pop", "japanese", "nhạc nhật", "japan",
            "japanese pop", "japanese rock", "j-rock", "jrock",
            "anime", "anime opening", "anime ending", "anime op", "anime ed",
            "anisong", "vocaloid", "hatsune miku", "miku",
            "city pop", "japanese city pop",
            "yoasobi", "ado", "fujii kaze", "kenshi yonezu",
            "lisa", "aimer", "eve", "yorushika", "zutomayo",
            "radwimps", "one ok rock", "oor", "official hige dandism",
            "back number", "mrs green apple", "king gnu",
            "amazarashi", "uverworld", "asian kung fu generation",
            "bump of chicken", "spitz", "l'arc en ciel", "x japan",
            "babymetal", "band maid", "scandal",
            "utada hikaru", "ayumi hamasaki", "namie amuro",
            "arashi", "smap", "exile", "sandaime j soul brothers",
            "aimyon", "milet", "ikuta lilas", "imase", "tani yuuki",
            "higedan", "creepy nuts", "gesu no kiwami",
            "akb48", "nogizaka46", "keyakizaka46", "hinatazaka46",
            "morning musume", "perfume",
        ],
    ),
    (
        "cpop",
        &[
            "cpop", "c-pop", "chinese", "mandopop", "cantopop",
            "nhạc trung", "nhạc hoa", "tiếng trung",
            "chinese pop", "taiwan pop", "hong kong pop",
            "jay chou", "周杰倫", "eason chan", "陳奕迅",
            "wang leehom", "jj lin", "林俊傑",
            "eric chou", "周興哲", "jackson wang", "王嘉爾",
            "lu han", "lay zhang", "kris wu", "tao",
            "zhou shen", "周深", "hua chenyu", "華晨宇",
            "li ronghao", "张杰", "dimash",
            "deng ziqi", "g.e.m.", "gem", "邓紫棋",
            "angela zhang", "張韶涵", "jolin tsai", "蔡依林",
            "hebe tien", "田馥甄", "alin", "a-lin",
            "bibi zhou", "周筆暢",
            "tfboys", "nine percent", "r1se",
            "snh48", "the9", "into1",
            "chinese drama ost", "cdrama ost", "ancient drama",
        ],
    ),
    (
        "lofi",
        &[
            "lofi", "lo-fi", "lo fi", "lofi hip hop",
            "chill", "chillhop", "chill hop", "jazz hop",
            "study music", "study beats", "focus music",
            "sleep music", "sleeping", "relax", "relaxing",
            "calm", "peaceful", "ambient", "atmospheric",
            "cafe music", "coffee shop", "work music",
            "meditation", "zen", "spa music",
            "rain sounds", "nature sounds", "asmr",
            "lofi girl", "chilledcow", "the jazz hop cafe",
            "college music", "homework radio",
            "nujabes", "j dilla", "tomppabeats", "jinsang",
            "idealism", "kupla", "bsd.u", "eevee",
        ],
    ),
    (
        "pop",
        &[
            "pop", "pop music", "pop song", "pop hit",
            "top 40", "top hits", "billboard", "chart",
            "mainstream", "radio hit", "trending", "viral",
            "tiktok", "tiktok song", "tiktok trend", "tiktok viral",
            "synth pop", "synthpop", "electropop", "dance pop",
            "indie pop", "chamber pop", "art pop", "baroque pop",
            "dream pop", "shoegaze", "noise pop",
            "taylor swift", "ariana grande", "billie eilish",
            "dua lipa", "olivia rodrigo", "sabrina carpenter",
            "lady gaga", "beyonce", "rihanna", "katy perry",
            "selena gomez", "demi lovato", "miley cyrus",
            "adele", "sia", "lorde", "halsey", "charli xcx",
            "cardi b", "nicki minaj", "megan thee stallion",
            "doja cat", "sza", "tyla", "ice spice",
            "lana del rey", "marina", "grimes", "fka twigs",
            "ed sheeran", "justin bieber", "shawn mendes",
            "harry styles", "zayn", "liam payne", "niall horan", "louis tomlinson",
            "bruno mars", "the weeknd", "charlie puth",
            "sam smith", "troye sivan", "hozier", "lewis capaldi",
            "john legend", "jason derulo", "chris brown",
            "bad bunny", "j balvin", "maluma", "daddy yankee",
            "one direction", "1d", "jonas brothers",
            "little mix", "fifth harmony",
        ],
    ),
    (
        "rnb",
        &[
            "rnb", "r&b", "rhythm and blues", "soul", "neo soul",
            "contemporary r&b", "alternative r&b", "pnb",
            "funk", "disco", "motown",
            "new jack swing", "quiet storm",
            "smooth", "groove", "vibe", "vibes", "sensual",
            "frank ocean", "daniel caesar",
            "h.e.r.", "summer walker", "jhene aiko", "kehlani",
            "bryson tiller", "6lack", "partynextdoor", "roy woods",
            "usher", "trey songz", "ne-yo",
            "alicia keys", "mary j blige", "brandy", "monica",
            "lauryn hill", "erykah badu", "jill scott", "maxwell",
            "d'angelo", "anderson paak", "silk sonic",
            "giveon", "lucky daye", "victoria monet", "chloe x halle",
            "brent faiyaz", "steve lacy", "omar apollo",
        ],
    ),
    (
        "indie",
        &[
            "indie", "indie music", "independent", "alternative",
            "indie folk", "indie electronic",
            "bedroom pop", "hyperpop", "experimental", "avant garde",
            "post punk", "new wave", "gothic rock", "darkwave",
            "folk", "folk rock", "singer songwriter",
            "americana", "country folk", "bluegrass",
            "tame impala", "mac demarco", "rex orange county",
            "clairo", "beabadoobee", "phoebe bridgers", "boygenius",
            "wallows", "the neighbourhood", "role model",
            "men i trust", "khruangbin",
            "vampire weekend", "mgmt", "foster the people",
            "glass animals", "alt-j", "two door cinema club",
            "bon iver", "sufjan stevens", "iron wine",
            "fleet foxes", "the lumineers", "of monsters and men",
            "vance joy", "passenger", "james bay",
            "daughter", "london grammar", "florence machine",
        ],
    ),
    (
        "jazz",
        &[
            "jazz", "jazz music", "smooth jazz", "acid jazz",
            "jazz fusion", "bebop", "swing", "big band",
            "free jazz", "modal jazz", "cool jazz", "hard bop",
            "jazz piano", "jazz guitar", "jazz saxophone",
            "miles davis", "john coltrane", "charlie parker",
            "louis armstrong", "duke ellington", "ella fitzgerald",
            "nina simone", "billie holiday", "sarah vaughan",
            "herbie hancock", "chick corea", "pat metheny",
            "kamasi washington", "robert glasper", "jacob collier",
        ],
    ),
    (
        "classical",
        &[
            "classical", "classical music", "orchestra", "symphony",
            "piano classical", "violin", "cello", "orchestral",
            "opera", "baroque", "romantic era",
            "beethoven", "mozart", "bach", "chopin", "tchaikovsky",
            "vivaldi", "haydn", "brahms", "schubert", "liszt",
            "debussy", "ravel", "stravinsky", "shostakovich",
            "yo-yo ma", "lang lang", "yiruma", "ludovico einaudi",
            "hans zimmer", "john williams", "ennio morricone",
            "movie soundtrack", "film score", "cinematic",
        ],
    ),
    (
        "country",
        &[
            "country", "country music", "country song",
            "country rock", "country pop", "bro country",
            "outlaw country", "traditional country", "honky tonk",
            "nashville", "western", "cowboy",
            "luke combs", "morgan wallen", "zach bryan",
            "chris stapleton", "luke bryan", "jason aldean",
            "carrie underwood", "miranda lambert", "maren morris",
            "kacey musgraves",
            "johnny cash", "dolly parton", "willie nelson",
            "garth brooks", "george strait", "tim mcgraw",
        ],
    ),
    (
        "latin",
        &[
            "latin", "latino", "spanish", "español", "espanol",
            "reggaeton", "reggaetón", "perreo", "dembow",
            "latin trap", "trap latino",
            "salsa", "bachata", "merengue", "cumbia",
            "tango", "bossa nova", "samba",
            "flamenco", "spanish guitar",
            "ozuna", "anuel aa", "rauw alejandro", "myke towers", "jhay cortez",
            "karol g", "becky g", "anitta", "rosalia", "rosalía",
            "shakira", "enrique iglesias", "ricky martin",
            "luis fonsi", "nicky jam", "farruko",
            "sebastian yatra", "camilo",
        ],
    ),
    (
        "reggae",
        &[
            "reggae", "reggae music", "roots reggae", "dub",
            "dancehall", "ragga", "ska", "rocksteady",
            "jamaica", "jamaican", "rasta", "rastafari",
            "bob marley", "peter tosh", "jimmy cliff",
            "damian marley", "stephen marley", "ziggy marley",
            "sean paul", "shaggy", "buju banton", "vybz kartel",
            "popcaan", "chronixx", "protoje", "koffee", "spice",
        ],
    ),
    (
        "bolero",
        &[
            "bolero", "nhạc vàng", "nhạc xưa", "nhạc trước 75",
            "nhạc sến", "tân nhạc",
            "dương hồng loan", "lệ quyên", "đàm vĩnh hưng",
            "chế linh", "tuấn vũ", "như quỳnh",
            "phi nhung", "quang lê", "mạnh quỳnh",
            "thanh tuyền", "hương lan", "giao linh",
        ],
    ),
    (
        "truitinh",
        &[
            "trữ tình", "nhạc trữ tình", "quê hương",
            "dân ca", "nhạc dân ca", "ca trù", "quan họ",
            "nhạc cách mạng", "nhạc đỏ",
            "ru con", "lullaby", "nhạc thiếu nhi",
            "tân cổ giao duyên", "cải lương", "vọng cổ",
            "hát văn", "hát xẩm", "hát chèo",
        ],
    ),
    (
        "ost",
        &[
            "ost", "soundtrack", "original soundtrack",
            "movie soundtrack", "film soundtrack",
            "nhạc phim", "nhạc phim việt", "nhạc phim hàn",
            "drama ost", "kdrama ost", "cdrama ost",
            "game soundtrack", "game ost", "video game music",
            "anime ost", "anime soundtrack",
            "musical", "broadway", "disney",
        ],
    ),
    (
        "worship",
        &[
            "worship", "praise", "gospel", "christian",
            "hillsong", "bethel", "elevation worship",
            "maverick city", "chris tomlin", "lauren daigle",
            "nhạc thánh", "thánh ca", "nhạc đạo",
        ],
    ),
    (
        "phonk",
        &[
            "phonk", "drift phonk", "brazilian phonk",
            "memphis rap", "cowbell", "aggressive phonk",
            "gym phonk", "workout phonk", "dark phonk",
            "ghostemane", "kordhell", "dvrst", "playaphonk",
        ],
    ),
];

/// Genre → search query templates used to find similar tracks
pub const GENRE_SEARCH_QUERIES: &[(&str, &[&str])] = &[
    ("edm", &["edm remix 2024", "best edm drops", "festival music", "electronic dance"]),
    ("ballad", &["ballad hay nhất 2024", "sad songs playlist", "nhạc buồn hay", "acoustic covers"]),
    ("rap", &["rap việt hay 2024", "hip hop 2024", "underground rap hot", "trap music"]),
    ("rock", &["rock songs 2024", "best rock music", "rock playlist", "alternative rock"]),
    ("vpop", &["vpop hay nhất 2024", "nhạc trẻ mới nhất", "nhạc việt hot", "vpop trending"]),
    ("kpop", &["kpop 2024", "best kpop songs", "kpop playlist", "kpop dance"]),
    ("jpop", &["jpop 2024", "japanese music", "anime songs", "jpop playlist"]),
    ("cpop", &["cpop 2024", "chinese pop songs", "mandopop playlist", "nhạc hoa hay"]),
    ("lofi", &["lofi hip hop", "lofi chill beats", "study music playlist", "relaxing music"]),
    ("pop", &["pop songs 2024", "top hits 2024", "viral songs", "trending music"]),
    ("rnb", &["rnb 2024", "r&b songs", "neo soul playlist", "smooth rnb"]),
    ("indie", &["indie music 2024", "indie playlist", "alternative songs", "bedroom pop"]),
    ("jazz", &["jazz music", "smooth jazz", "jazz playlist", "jazz café"]),
    ("classical", &["classical music", "piano classical", "orchestra music", "relaxing classical"]),
    ("country", &["country songs 2024", "country music playlist", "new country"]),
    ("latin", &["latin music 2024", "reggaeton playlist", "latin hits", "bachata"]),
    ("reggae", &["reggae music", "reggae playlist", "dancehall 2024", "roots reggae"]),
    ("bolero", &["bolero hay nhất", "nhạc vàng hay", "nhạc sến hay nhất"]),
    ("truitinh", &["nhạc trữ tình hay", "nhạc quê hương", "dân ca việt nam"]),
    ("ost", &["nhạc phim hay", "drama ost", "movie soundtrack", "anime ost"]),
    ("worship", &["worship songs 2024", "praise music", "gospel playlist"]),
    ("phonk", &["phonk music 2024", "drift phonk playlist", "aggressive phonk"]),
];

/// Query templates for one genre, if it has any
pub fn queries_for(genre: &str) -> Option<&'static [&'static str]> {
    GENRE_SEARCH_QUERIES
        .iter()
        .find(|(g, _)| *g == genre)
        .map(|(_, queries)| *queries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_genre_has_queries() {
        for (genre, keywords) in GENRE_KEYWORDS {
            assert!(!keywords.is_empty(), "genre {} has no keywords", genre);
            assert!(
                queries_for(genre).is_some(),
                "genre {} has no search queries",
                genre
            );
        }
    }

    #[test]
    fn test_keywords_are_lowercase() {
        // Detection lowercases the title once; the table must already be
        // lowercase for substring matching to work
        for (genre, keywords) in GENRE_KEYWORDS {
            for keyword in *keywords {
                assert_eq!(
                    *keyword,
                    keyword.to_lowercase(),
                    "keyword '{}' in genre {} is not lowercase",
                    keyword,
                    genre
                );
            }
        }
    }
}
