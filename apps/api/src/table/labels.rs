//! Display labels for the coded fields of a job detail.
//!
//! Each coded field is a Rust enum so adding a code forces its label to be
//! written. Codes the tables do not know render as `不明`.

pub const UNKNOWN: &str = "不明";

/// Prefecture names indexed by JIS X 0401 code − 1.
const PREFECTURES: [&str; 47] = [
    "北海道", "青森県", "岩手県", "宮城県", "秋田県", "山形県", "福島県",
    "茨城県", "栃木県", "群馬県", "埼玉県", "千葉県", "東京都", "神奈川県",
    "新潟県", "富山県", "石川県", "福井県", "山梨県", "長野県", "岐阜県",
    "静岡県", "愛知県", "三重県", "滋賀県", "京都府", "大阪府", "兵庫県",
    "奈良県", "和歌山県", "鳥取県", "島根県", "岡山県", "広島県", "山口県",
    "徳島県", "香川県", "愛媛県", "高知県", "福岡県", "佐賀県", "長崎県",
    "熊本県", "大分県", "宮崎県", "鹿児島県", "沖縄県",
];

pub fn prefecture(code: i64) -> &'static str {
    usize::try_from(code)
        .ok()
        .and_then(|c| c.checked_sub(1))
        .and_then(|i| PREFECTURES.get(i))
        .copied()
        .unwrap_or(UNKNOWN)
}

/// A field whose wire value is an integer code with a fixed display label.
pub trait Coded: Sized + Copy {
    fn from_code(code: i64) -> Option<Self>;
    fn label(self) -> &'static str;
}

/// Label for an optional code; absent renders empty, unknown renders `不明`.
pub fn label_of<T: Coded>(code: Option<i64>) -> &'static str {
    match code {
        None => "",
        Some(code) => T::from_code(code).map_or(UNKNOWN, T::label),
    }
}

macro_rules! coded {
    ($name:ident { $($variant:ident = $code:literal => $label:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $($variant),+
        }

        impl Coded for $name {
            fn from_code(code: i64) -> Option<Self> {
                match code {
                    $($code => Some($name::$variant),)+
                    _ => None,
                }
            }

            fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }
    };
}

// Provisional: the codes below are reconstructed, not taken from the platform's
// published definitions. Verify against the upstream code tables before relying
// on exported labels.
coded!(Position {
    Member = 1 => "メンバー",
    Leader = 2 => "リーダー",
    Manager = 3 => "マネージャー",
    Director = 4 => "部長クラス",
    Executive = 5 => "役員クラス",
});

coded!(WorkStyle {
    FullTime = 1 => "正社員",
    Contract = 2 => "契約社員",
    Dispatch = 3 => "派遣社員",
    Outsourcing = 4 => "業務委託",
    PartTime = 5 => "パート・アルバイト",
});

coded!(BonusFrequency {
    None = 0 => "なし",
    Once = 1 => "年1回",
    Twice = 2 => "年2回",
    ThreeOrMore = 3 => "年3回以上",
});

coded!(BonusRecord {
    NoRecord = 0 => "実績なし",
    UnderOneMonth = 1 => "1ヶ月分未満",
    OneToTwoMonths = 2 => "1〜2ヶ月分",
    TwoToThreeMonths = 3 => "2〜3ヶ月分",
    ThreeToFourMonths = 4 => "3〜4ヶ月分",
    FourMonthsOrMore = 5 => "4ヶ月分以上",
});

coded!(Incentive {
    None = 0 => "なし",
    Available = 1 => "あり",
});

coded!(Relocation {
    None = 0 => "なし",
    NotForNow = 1 => "当面なし",
    Possible = 2 => "あり",
});

coded!(NightShift {
    None = 0 => "なし",
    Occasional = 1 => "あり",
});

coded!(Overtime {
    UnderTen = 1 => "10時間未満",
    TenToTwenty = 2 => "10〜20時間",
    TwentyToThirty = 3 => "20〜30時間",
    ThirtyToFortyFive = 4 => "30〜45時間",
    OverFortyFive = 5 => "45時間以上",
});

coded!(CommissionEarnedAt {
    OnJoining = 1 => "入社時",
    AfterProbation = 2 => "試用期間終了時",
    AfterOffer = 3 => "内定承諾時",
});
