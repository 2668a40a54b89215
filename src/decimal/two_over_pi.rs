//! Decimal expansion of 2/pi for large-argument trig reduction.
//!
//! The table holds the first 6400 fractional digits, enough to reduce any
//! finite decimal128 argument (adjusted exponent up to 6144) with a full
//! window to spare.

/// Fractional digits of 2/pi = 0.6366...
const DIGITS: &str = concat!(
    "6366197723675813430755350534900574481378385829618257949906693762355871905369061403604552110650123438",
    "2429137090703183214757164738445831461151186964292679935691695986774963631029231098558770123075486957",
    "1584869590646773449560966894516047329520456890799022863761847560347610695824481957643747751376342114",
    "8923997857736009946893909578384435932923871322996246679458512187977946087515262991462678569641559834",
    "9655739443993547239679984977150234068471543372447007506864218619014795203895784145903733507223720997",
    "7986541221308627102012881299111265588664091786992478392663362424067212143992535647949995331146617741",
    "1190202800649627102575553982852435204887975045907255110589515625322721858319139270452497092562798431",
    "0009800119103942835622761118714052610084006527098408369924642496224582481258593635699383676574084630",
    "1630224803486106427208868636563029898330890390985141599500621317563255927089637433019188293314876162",
    "7999036306308313973881574359312348693702561467580466501828237733105250746001044908718846128450398017",
    "5467178015050224334526846781039032512899766493337258042449414751425245454676866856827898784051700231",
    "3344212478434378039358226874839818986041726495262070323357771919883998021017550264517783533227384203",
    "1411660605641619571954025552643104787972293641559983147675623923749510882475017289087572054650210449",
    "5512155015552442725627061736331311410773370719822428316154424141095598498050398299710518809437638233",
    "7204659318564742310849623017797828087159079169637961309179080866598414261272614176015362759498870766",
    "3550527638660278576191078827507346271124191191818014135830332075273547517510644992598122398623208763",
    "3439500414050851617292632199487874751103786265384884136817763421991401517095477717414647751131714943",
    "7513738812920948583351694228474545367717840732729167856660035132317325413991163989834597161069802439",
    "5747563783532201348122152218924928632377279070412913252567592389992897533406974279593900041580027355",
    "2015914689439843209601095604349981941915169427304455979561307598970833398445968331561510713897214201",
    "8273824334685917233826893308141941570224808347357296398248847013273576083883174283099861995234744265",
    "4438746478681498981684113248770073848993399646445982662241518787045597251319843104331119604031321440",
    "0935309195163416095504622978172370404764021735199355618619684993180642829141202090884094407009325269",
    "2719037244201312620437495654558581223170428720334471819506898583921895909169792436803748503147673331",
    "5835451359617434746665590269378056380145493087669724555226553229036921103893802421928511121482613511",
    "3212868395093986627396320130795402696716585873403312646741325734464292398059941247927893503377683936",
    "6623816609002573577251457761535534246035190865800682588270075098242366434867431431756904939025326844",
    "5319946237663875628794027549769202300767908227601528735702488135496941450272334166260691884352468871",
    "8374733025954074999899483421246639322440556857817840645953811081004564428099408695898041546694561549",
    "1440398699572694247248284696191559747554622769231394009222822857625455452809474080429640229943691244",
    "6288787201591299038120066783408849213856750946017418705858262638876044923390683972388343651345866767",
    "6710775516573326226602679252865660840358284691449537042827138070404453803202797907368942795849952206",
    "3103923813588323419002390145062596137577816823271545742732168001260382378973757010179402699657163459",
    "0057692132853298278046539782710157576961443621753342113169736881397937464605865291440991066664198125",
    "6262937430212056363311952365914677373969095041053999131982807264785728493256190305158993633156469638",
    "9913055159672679975794999086079592749066517840732215833310083694540274155569138729890398901132030674",
    "2775033463889167929771898962465527324558332269773940677143895329495706496097380079912397616087584539",
    "3370944547057996553086166642536993174549674024490443445284799453385138839767359770971823662513335961",
    "9215284700046448466688207650317214211716964537612464536449981273543707833961775387231396389593123542",
    "1188180612215965603954795363534619346608898674496349016056160364714968488180923013389589015259761553",
    "6762347369246378529097735626450064957242513278129553356852613822552604700814043498382328044950174390",
    "7262136074962957736145359121552688401812676731807795183670695816711516974110469628984237566410929131",
    "5178727745965157988598137302108943666371922899199432245076029328753781071773401823207809970265224819",
    "5064645374613596811501808342213765763962051930909818636472528893136204666462602839350229734918194524",
    "8164486865523662424644662928000333224458424725121305034783806409852866455430645921887973083108526576",
    "4806379840442531322083038333940122031638233993192874696115935420553295828083230559020171690393905882",
    "8406570789753801723666345811344129973441741862895023166454652964818312398788626536088635221831772531",
    "3112022098452835560749684843697956416402086198723884548830160228438536265725429817596639077743155683",
    "1737024711320889480459456997009569949148525280870669443026582393090438296626409375149745165284389943",
    "5886028522956416290574165671882288906191921526051038316496010137872192881046936919600408193224985213",
    "5185898712762007247321500615211518093733678200854275908365162245727151516834482297999703159027607396",
    "8412968258855407645552590256083904221958317514056561658122060633585712930616240824132475663462810883",
    "4500107966557500611154944243245822779368412896310909096866054569374679708653612376212299226107403720",
    "6635685476856572517485364246286148562481591390473706011912314425067879843236736893905340190986876069",
    "8018057846655313848329634694380409485211617775117634140137817705336522505229838055321240917258773786",
    "7331407065312966060840717690577582872486868087025968785779758612888875063395297804763760536201772855",
    "9434514484332717575843377559207659149559089324114524052594782085048207311225397828474651113026395324",
    "0214062092666393757636088722525781808485191589378859549650330728954409441084399247660822752938895934",
    "3205346427351453154717144789294690144267408674252804779591229358336767626638335471411764967487286911",
    "9500244157842592783429824802435684913665577495386198359728113924945733864478829297238183436293447514",
    "5162527400660425070307404865430354785229807996880043106707323787925990249072973917468524336484087808",
    "3597927649776195004684236737655963155782310073848647616612373817521123575451229295031446107118845732",
    "9296787943122255052072353754656242870147328545051868489704377141604438528730510604804680902117171586",
    "2237843281975363627630427680158185847665600862693440716385274915679945373643476128023186548412514449",
);

/// Fractional digit `i` of 2/pi, counting from 1. Zero past the table.
pub(crate) fn digit(i: usize) -> u8 {
    match i.checked_sub(1).and_then(|k| DIGITS.as_bytes().get(k)) {
        Some(b) => b - b'0',
        None => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table() {
        assert_eq!(DIGITS.len(), 6400);
        assert!(DIGITS.bytes().all(|b| b.is_ascii_digit()));
        let head: String = (1..=12).map(|i| char::from(b'0' + digit(i))).collect();
        assert_eq!(head, "636619772367");
        assert_eq!(digit(0), 0);
        assert_eq!(digit(6401), 0);
    }
}
